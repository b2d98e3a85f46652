//! Error types for sheetcalc-core

use thiserror::Error;

use crate::cell::Address;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures of sheet operations.
///
/// None of these leave the sheet partially updated. Errors computed by
/// formulas are not in this list; they are [`ComputedError`](crate::ComputedError)
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Address outside the sheet limits
    #[error("Invalid cell address: row {}, column {}", .0.row, .0.col)]
    InvalidAddress(Address),

    /// Text that is not A1 notation
    #[error("Invalid cell address text: '{0}'")]
    InvalidAddressText(String),

    /// Formula parse error
    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    /// Setting the content would close a dependency cycle
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Address),
}
