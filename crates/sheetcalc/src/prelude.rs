//! Prelude module - common imports for sheetcalc users
//!
//! ```rust
//! use sheetcalc::prelude::*;
//! ```

pub use crate::{
    Address,
    CellContent,
    CellView,
    ComputedError,
    Error,
    Formula,
    RenderOptions,
    Result,
    Sheet,
    Size,
    Value,
};
