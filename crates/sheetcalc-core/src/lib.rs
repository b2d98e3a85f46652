//! # sheetcalc-core
//!
//! Core data structures for the sheetcalc spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout sheetcalc:
//! - [`Address`] and [`Size`] - Cell positions and the printable area
//! - [`Value`] - The result of reading a cell (number, text or error)
//! - [`ComputedError`] - Errors produced by formula evaluation
//! - [`Error`] - Structural failures of sheet operations
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{Address, ComputedError, Value};
//!
//! let addr = Address::parse("B2").unwrap();
//! assert_eq!(addr, Address::new(1, 1));
//! assert!(addr.is_valid());
//!
//! assert_eq!(Value::from(" 12 ").to_number(), Ok(12.0));
//! assert_eq!(Value::from("abc").to_number(), Err(ComputedError::Value));
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{Address, ComputedError, Size, Value};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u32 = 16_384;
