//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while building a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Lexical or syntactic malformation
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<FormulaError> for sheetcalc_core::Error {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::Parse(msg) => sheetcalc_core::Error::FormulaParse(msg),
        }
    }
}
