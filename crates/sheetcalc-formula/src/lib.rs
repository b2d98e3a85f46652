//! # sheetcalc-formula
//!
//! Formula parser and evaluator for sheetcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical re-serialisation of a parsed formula
//! - Formula evaluation against a [`ReferenceResolver`]
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_formula::{Formula, EmptyResolver};
//!
//! let formula = Formula::parse("1 + 2*(3)").unwrap();
//! assert_eq!(formula.expression(), "1+2*3");
//! assert_eq!(formula.evaluate(&EmptyResolver), Ok(7.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EmptyResolver, Evaluation, ReferenceResolver};
pub use formula::Formula;
pub use parser::{parse_formula, MAX_DEPTH, MAX_NESTING};
