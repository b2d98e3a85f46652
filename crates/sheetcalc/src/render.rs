//! Plain-text rendering of the printable area
//!
//! Every row of `[0, rows) x [0, cols)` becomes one line of delimited
//! fields. Slots without content render as empty fields; no quoting is
//! applied.

use crate::cell::Cell;
use crate::sheet::Sheet;
use sheetcalc_core::Address;
use std::io::{self, Write};

/// Options for rendering a sheet
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Field delimiter (default: tab)
    pub delimiter: char,
    /// Line terminator written after every row
    pub line_terminator: LineTerminator,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// Unix-style (LF)
    #[default]
    LF,
    /// Windows-style (CRLF)
    CRLF,
    /// Mac classic (CR)
    CR,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::LF => "\n",
            LineTerminator::CRLF => "\r\n",
            LineTerminator::CR => "\r",
        }
    }
}

impl Sheet {
    /// Write the current values of the printable area
    pub fn render_values<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.render_values_with(writer, &RenderOptions::default())
    }

    /// Write the editing text of the printable area
    pub fn render_texts<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.render_texts_with(writer, &RenderOptions::default())
    }

    pub fn render_values_with<W: Write>(
        &self,
        writer: &mut W,
        options: &RenderOptions,
    ) -> io::Result<()> {
        self.render_with(writer, options, |address, cell| {
            cell.value(address, self).to_string()
        })
    }

    pub fn render_texts_with<W: Write>(
        &self,
        writer: &mut W,
        options: &RenderOptions,
    ) -> io::Result<()> {
        self.render_with(writer, options, |_, cell| cell.content().text())
    }

    fn render_with<W, F>(&self, writer: &mut W, options: &RenderOptions, field: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(Address, &Cell) -> String,
    {
        let size = self.printable_size();
        let terminator = options.line_terminator.as_str();
        let mut delimiter = [0u8; 4];
        let delimiter = options.delimiter.encode_utf8(&mut delimiter).as_bytes();

        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    writer.write_all(delimiter)?;
                }
                let address = Address::new(row, col);
                if let Some(cell) = self.record(address) {
                    writer.write_all(field(address, cell).as_bytes())?;
                }
            }
            writer.write_all(terminator.as_bytes())?;
        }

        writer.flush()
    }
}
