//! # sheetcalc
//!
//! A spreadsheet calculation engine: cells hold literal text or formulas,
//! formulas read other cells, and the sheet refuses any edit that would make
//! a formula depend on itself.
//!
//! ## Features
//!
//! - Formulas with `+ - * /`, unary signs, parentheses and A1 references
//! - Computed errors (`#REF!`, `#VALUE!`, `#DIV/0!`) that propagate as values
//! - Cycle detection before every edit, leaving the sheet untouched on failure
//! - Plain-text rendering of values or editing text
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//!
//! sheet.set_cell("A1", "=1+2*3").unwrap();
//! sheet.set_cell("B1", "=A1/2").unwrap();
//! assert_eq!(sheet.value("B1").unwrap(), Value::Number(3.5));
//!
//! // A1 cannot read B1 while B1 reads A1
//! assert!(matches!(
//!     sheet.set_cell("A1", "=B1"),
//!     Err(Error::CircularDependency(_))
//! ));
//!
//! let mut out = Vec::new();
//! sheet.render_values(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "7\t3.5\n");
//! ```

pub mod cell;
pub mod graph;
pub mod prelude;
pub mod render;
pub mod sheet;

pub use cell::{Cell, CellContent, CellView, ESCAPE_MARKER, FORMULA_SIGIL};
pub use graph::DependencyGraph;
pub use render::{LineTerminator, RenderOptions};
pub use sheet::Sheet;

// Re-export core types
pub use sheetcalc_core::{
    Address, ComputedError, Error, Result, Size, Value, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use sheetcalc_formula::{
    evaluate, parse_formula, EmptyResolver, Evaluation, Expr, Formula, FormulaError,
    ReferenceResolver,
};
