//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Address`] - A cell's location (e.g., "A1")
//! - [`Size`] - The printable bounding box of a sheet
//! - [`Value`] - The value read from a cell
//! - [`ComputedError`] - Error values produced by formulas

mod address;
mod value;

pub use address::{Address, Size};
pub use value::{ComputedError, Value};
