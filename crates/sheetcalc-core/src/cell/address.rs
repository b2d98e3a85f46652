//! Cell address and printable size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "C12")
///
/// Rows and columns are zero-based. An address may exist outside the sheet
/// limits (formulas can name any cell); [`Address::is_valid`] is the bounds
/// check every sheet operation relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl Address {
    /// An address that cannot be indexed at all (row 0 in A1 notation,
    /// numeric overflow). Never valid; displays as `#REF!`.
    pub const NONE: Address = Address {
        row: u32::MAX,
        col: u32::MAX,
    };

    /// Create a new cell address
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Check that the address lies within the sheet limits
    pub const fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` markers are accepted and ignored. Text that is well-formed but
    /// names a cell beyond the sheet limits parses successfully into an
    /// address for which [`is_valid`](Self::is_valid) is false.
    ///
    /// # Examples
    /// ```
    /// use sheetcalc_core::Address;
    ///
    /// let addr = Address::parse("A1").unwrap();
    /// assert_eq!(addr, Address::new(0, 0));
    ///
    /// let addr = Address::parse("$B$2").unwrap();
    /// assert_eq!(addr, Address::new(1, 1));
    ///
    /// assert!(!Address::parse("A99999").unwrap().is_valid());
    /// assert!(Address::parse("1A").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddressText(s.to_string()));
        }
        let letters = &s[col_start..pos];

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let digits = &s[pos..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddressText(s.to_string()));
        }

        Ok(Self::from_a1_parts(letters, digits))
    }

    /// Build an address from already-split column letters and row digits.
    ///
    /// Returns [`Address::NONE`] when either part cannot be indexed.
    pub fn from_a1_parts(letters: &str, digits: &str) -> Self {
        let col = Self::letters_to_column(letters);
        let row = digits
            .parse::<u32>()
            .ok()
            .and_then(|row| row.checked_sub(1));

        match (row, col) {
            (Some(row), Some(col)) => Self::new(row, col),
            _ => Self::NONE,
        }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = u64::from(col) + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Case-insensitive. Returns `None` for empty or non-alphabetic input
    /// and on overflow.
    pub fn letters_to_column(letters: &str) -> Option<u32> {
        if letters.is_empty() {
            return None;
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            col = col.checked_mul(26)?.checked_add(digit)?;
        }

        Some(col - 1)
    }

    /// Format as A1-style string, or `#REF!` for [`Address::NONE`]
    pub fn to_a1_string(&self) -> String {
        if self.row == u32::MAX || self.col == u32::MAX {
            return "#REF!".to_string();
        }

        let mut result = Self::column_to_letters(self.col);
        result.push_str(&(u64::from(self.row) + 1).to_string());
        result
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The printable area of a sheet: the smallest origin-anchored rectangle
/// covering every cell record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: u32,
    pub cols: u32,
}

impl Size {
    /// Create a new size
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Check if the rectangle covers no cells
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Grow (never shrink) to cover `addr`
    pub fn include(&mut self, addr: Address) {
        self.rows = self.rows.max(addr.row.saturating_add(1));
        self.cols = self.cols.max(addr.col.saturating_add(1));
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
