//! Cell value types

use std::fmt;

/// The value read from a cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value (always finite)
    Number(f64),

    /// Text value; an empty cell reads as empty text
    Text(String),

    /// Error produced while evaluating a formula
    Error(ComputedError),
}

impl Value {
    /// The value of a cell with no content
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get the number if this is a numeric value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error if this is one
    pub fn as_error(&self) -> Option<ComputedError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Coerce to a number for use as a formula operand.
    ///
    /// Text is trimmed; empty text is `0`; text that is not entirely a finite
    /// number is [`ComputedError::Value`]. Errors propagate unchanged.
    pub fn to_number(&self) -> Result<f64, ComputedError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(0.0);
                }
                match s.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    _ => Err(ComputedError::Value),
                }
            }
            Value::Error(e) => Err(*e),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<ComputedError> for Value {
    fn from(e: ComputedError) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, ComputedError>> for Value {
    fn from(result: Result<f64, ComputedError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

/// Errors computed by formulas.
///
/// These are ordinary data: they propagate through arithmetic and through
/// cell references, and are rendered with their marker text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputedError {
    /// #REF! - Reference to a cell outside the sheet
    Ref,
    /// #VALUE! - Operand is not a number
    Value,
    /// #DIV/0! - Division by zero
    Div0,
}

impl ComputedError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputedError::Ref => "#REF!",
            ComputedError::Value => "#VALUE!",
            ComputedError::Div0 => "#DIV/0!",
        }
    }

    /// Parse an error marker (case-insensitive)
    pub fn from_marker(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#REF!" => Some(ComputedError::Ref),
            "#VALUE!" => Some(ComputedError::Value),
            "#DIV/0!" => Some(ComputedError::Div0),
            _ => None,
        }
    }
}

impl fmt::Display for ComputedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
