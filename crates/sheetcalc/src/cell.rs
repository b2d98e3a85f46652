//! Cell content and the read-only cell view handed out by [`Sheet`]

use crate::sheet::Sheet;
use sheetcalc_core::{Address, Result, Value};
use sheetcalc_formula::Formula;

/// Leading character that turns the rest of the text into a formula
pub const FORMULA_SIGIL: char = '=';

/// Leading character that forces literal text; stripped from the value only
pub const ESCAPE_MARKER: char = '\'';

/// What a cell holds
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    /// No user content
    #[default]
    Empty,
    /// Literal text, stored exactly as entered
    Text(String),
    /// Parsed formula (entered with a leading `=`)
    Formula(Formula),
}

impl CellContent {
    /// Classify raw input text.
    ///
    /// A lone `=` is literal text, not an empty formula.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        match text.strip_prefix(FORMULA_SIGIL) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(Formula::parse(expression)?))
            }
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// Short name of the content kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            CellContent::Empty => "empty",
            CellContent::Text(_) => "text",
            CellContent::Formula(_) => "formula",
        }
    }

    /// Text shown when editing the cell
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => {
                format!("{}{}", FORMULA_SIGIL, formula.expression())
            }
        }
    }

    /// Valid addresses read by this content, each once, in order of first
    /// appearance
    pub fn referenced_addresses(&self) -> Vec<Address> {
        match self {
            CellContent::Empty | CellContent::Text(_) => Vec::new(),
            CellContent::Formula(formula) => formula.referenced_cells(),
        }
    }
}

/// A cell record in the sheet
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub(crate) content: CellContent,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Current value of the cell stored at `address`. Formulas are
    /// evaluated against `sheet`.
    pub(crate) fn value(&self, address: Address, sheet: &Sheet) -> Value {
        match &self.content {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => literal_value(text),
            CellContent::Formula(formula) => {
                Value::from(sheet.evaluate_formula(address, formula))
            }
        }
    }
}

/// Value of literal text: one leading escape marker is dropped
pub(crate) fn literal_value(text: &str) -> Value {
    Value::text(text.strip_prefix(ESCAPE_MARKER).unwrap_or(text))
}

/// Borrowed view of a cell together with the sheet it lives in
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    address: Address,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(sheet: &'a Sheet, address: Address, cell: &'a Cell) -> Self {
        Self {
            sheet,
            address,
            cell,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn content(&self) -> &'a CellContent {
        &self.cell.content
    }

    /// Current value, recomputed on every call
    pub fn value(&self) -> Value {
        self.cell.value(self.address, self.sheet)
    }

    pub fn text(&self) -> String {
        self.cell.content.text()
    }

    pub fn referenced_addresses(&self) -> Vec<Address> {
        self.cell.content.referenced_addresses()
    }

    /// Whether any formula in the sheet reads this cell
    pub fn is_referenced(&self) -> bool {
        self.sheet.graph().has_dependents(self.address)
    }

    /// Cells whose formulas read this cell, sorted by address
    pub fn dependents(&self) -> Vec<Address> {
        let mut dependents: Vec<Address> = self.sheet.graph().dependents(self.address).collect();
        dependents.sort();
        dependents
    }
}
