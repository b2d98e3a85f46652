//! The sheet: cell storage, dependency bookkeeping and the printable area

use crate::cell::{literal_value, Cell, CellContent, CellView};
use crate::graph::DependencyGraph;
use ahash::AHashMap;
use log::{debug, trace, warn};
use sheetcalc_core::{Address, ComputedError, Error, Result, Size, Value};
use sheetcalc_formula::{Evaluation, Formula, ReferenceResolver};

/// A sparse grid of cells whose formulas may read one another
///
/// Every mutation keeps the dependency graph acyclic: content that would
/// close a cycle is rejected before anything is changed.
///
/// Values are never kept between reads. Reading a formula cell evaluates
/// every formula beneath it in the dependency graph, each once, so a read
/// always reflects the current contents.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: AHashMap<Address, Cell>,
    graph: DependencyGraph,
    size: Size,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Cell Modification ===

    /// Set the content of a cell by address string (e.g., "A1")
    pub fn set_cell(&mut self, address: &str, text: &str) -> Result<()> {
        let addr = Address::parse(address)?;
        self.set_cell_at(addr, text)
    }

    /// Set the content of a cell.
    ///
    /// `text` starting with `=` (and longer than that) is parsed as a
    /// formula; anything else non-empty is literal text and the empty
    /// string clears the content.
    ///
    /// Fails with [`Error::FormulaParse`] or [`Error::CircularDependency`]
    /// without changing the sheet. On success, cells the formula reads that
    /// have no record yet are created empty.
    pub fn set_cell_at(&mut self, address: Address, text: &str) -> Result<()> {
        validate_address(address)?;

        let content = CellContent::from_text(text)?;
        let references = content.referenced_addresses();

        // Only existing records can already depend on this cell. The target
        // counts as existing so that self references are caught.
        let existing: Vec<Address> = references
            .iter()
            .copied()
            .filter(|r| *r == address || self.cells.contains_key(r))
            .collect();
        if self.graph.would_create_cycle(address, &existing) {
            warn!("Rejected content for {}: circular dependency", address);
            return Err(Error::CircularDependency(address));
        }

        let kind = content.kind();
        self.cells.entry(address).or_default().content = content;
        self.size.include(address);

        let mut vivified = 0;
        for &reference in &references {
            if !self.cells.contains_key(&reference) {
                self.cells.insert(reference, Cell::default());
                self.size.include(reference);
                vivified += 1;
            }
        }
        self.graph.replace_precedents(address, &references);

        debug!(
            "Set {} to {} content ({} precedents, {} cells created)",
            address,
            kind,
            references.len(),
            vivified
        );
        Ok(())
    }

    /// Clear a cell by address string
    pub fn clear_cell(&mut self, address: &str) -> Result<()> {
        let addr = Address::parse(address)?;
        self.clear_cell_at(addr)
    }

    /// Clear a cell.
    ///
    /// The content becomes empty and the cell stops depending on anything.
    /// A cell still read by other formulas keeps an empty record; otherwise
    /// the record is dropped. The printable size is then recomputed and may
    /// shrink.
    pub fn clear_cell_at(&mut self, address: Address) -> Result<()> {
        validate_address(address)?;

        if !self.cells.contains_key(&address) {
            return Ok(());
        }

        self.graph.clear_precedents(address);
        if self.graph.has_dependents(address) {
            if let Some(cell) = self.cells.get_mut(&address) {
                cell.content = CellContent::Empty;
            }
        } else {
            self.cells.remove(&address);
            trace!("Dropped record for {}", address);
        }

        self.size = self.rescan_size();
        debug!("Cleared {}, printable size now {}", address, self.size);
        Ok(())
    }

    // === Cell Access ===

    /// Get a cell by address string
    pub fn cell(&self, address: &str) -> Result<Option<CellView<'_>>> {
        let addr = Address::parse(address)?;
        self.cell_at(addr)
    }

    /// Get a cell. `None` when the address holds no record.
    pub fn cell_at(&self, address: Address) -> Result<Option<CellView<'_>>> {
        validate_address(address)?;
        Ok(self
            .cells
            .get(&address)
            .map(|cell| CellView::new(self, address, cell)))
    }

    /// Get a cell value (convenience method)
    pub fn value(&self, address: &str) -> Result<Value> {
        let addr = Address::parse(address)?;
        self.value_at(addr)
    }

    /// Get a cell value; cells without a record read as empty text
    pub fn value_at(&self, address: Address) -> Result<Value> {
        validate_address(address)?;
        Ok(self
            .cells
            .get(&address)
            .map(|cell| cell.value(address, self))
            .unwrap_or_default())
    }

    /// Get the editing text of a cell (convenience method)
    pub fn text(&self, address: &str) -> Result<String> {
        let addr = Address::parse(address)?;
        self.text_at(addr)
    }

    pub fn text_at(&self, address: Address) -> Result<String> {
        validate_address(address)?;
        Ok(self
            .cells
            .get(&address)
            .map(|cell| cell.content().text())
            .unwrap_or_default())
    }

    // === Bookkeeping ===

    /// Smallest origin-anchored rectangle covering every cell record,
    /// including empty ones
    pub fn printable_size(&self) -> Size {
        self.size
    }

    /// Number of cell records
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Addresses holding a record, sorted row-major
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.cells.keys().copied().collect();
        addresses.sort();
        addresses
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub(crate) fn record(&self, address: Address) -> Option<&Cell> {
        self.cells.get(&address)
    }

    /// Evaluate `formula`, stored at `root`, against the current contents.
    ///
    /// Formula precedents are visited in post-order on an explicit stack so
    /// that long reference chains do not grow the call stack. Results live
    /// only for this read.
    pub(crate) fn evaluate_formula(&self, root: Address, formula: &Formula) -> Evaluation {
        let mut results: AHashMap<Address, Evaluation> = AHashMap::new();
        let mut stack: Vec<(Address, bool)> =
            self.graph.precedents(root).map(|p| (p, false)).collect();

        while let Some((address, expanded)) = stack.pop() {
            if results.contains_key(&address) {
                continue;
            }
            let Some(CellContent::Formula(inner)) = self.cells.get(&address).map(Cell::content)
            else {
                continue;
            };
            if expanded {
                let value = inner.evaluate(&|a: Address| self.resolve_with(a, &results));
                results.insert(address, value);
            } else {
                stack.push((address, true));
                stack.extend(
                    self.graph
                        .precedents(address)
                        .filter(|p| !results.contains_key(p))
                        .map(|p| (p, false)),
                );
            }
        }

        trace!("Evaluated {} with {} formula precedents", root, results.len());
        formula.evaluate(&|a: Address| self.resolve_with(a, &results))
    }

    fn resolve_with(&self, address: Address, results: &AHashMap<Address, Evaluation>) -> Evaluation {
        match self.cells.get(&address).map(Cell::content) {
            None | Some(CellContent::Empty) => Ok(0.0),
            Some(CellContent::Text(text)) => literal_value(text).to_number(),
            // Precedents are evaluated before their dependents
            Some(CellContent::Formula(_)) => results
                .get(&address)
                .copied()
                .unwrap_or(Err(ComputedError::Ref)),
        }
    }

    fn rescan_size(&self) -> Size {
        let mut size = Size::default();
        for &address in self.cells.keys() {
            size.include(address);
        }
        trace!("Rescanned {} records, printable size {}", self.cells.len(), size);
        size
    }
}

impl ReferenceResolver for Sheet {
    fn resolve(&self, address: Address) -> Evaluation {
        match self.cells.get(&address) {
            Some(cell) => cell.value(address, self).to_number(),
            None => Ok(0.0),
        }
    }
}

fn validate_address(address: Address) -> Result<()> {
    if address.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidAddress(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_set_and_read() {
        let mut sheet = Sheet::new();
        sheet.set_cell("A1", "=1+2*3").unwrap();
        sheet.set_cell("B1", "hello").unwrap();

        assert_eq!(sheet.value("A1").unwrap(), Value::Number(7.0));
        assert_eq!(sheet.text("A1").unwrap(), "=1+2*3");
        assert_eq!(sheet.value("B1").unwrap(), Value::text("hello"));
        assert_eq!(sheet.value("C1").unwrap(), Value::empty());
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_rejected_set_leaves_sheet_untouched() {
        let mut sheet = Sheet::new();
        sheet.set_cell("A1", "=B1").unwrap();

        let size = sheet.printable_size();
        assert!(matches!(
            sheet.set_cell("B1", "=A1+C9"),
            Err(Error::CircularDependency(_))
        ));
        assert!(matches!(
            sheet.set_cell("D4", "=1+"),
            Err(Error::FormulaParse(_))
        ));

        assert_eq!(sheet.printable_size(), size);
        assert_eq!(sheet.addresses(), vec![addr("A1"), addr("B1")]);
        assert!(sheet.cell("B1").unwrap().unwrap().content().is_empty());
        assert!(sheet.cell("C9").unwrap().is_none());
    }

    #[test]
    fn test_resolver_reads_live_values() {
        let mut sheet = Sheet::new();
        sheet.set_cell("A1", " 4 ").unwrap();
        sheet.set_cell("A2", "x").unwrap();

        assert_eq!(sheet.resolve(addr("A1")), Ok(4.0));
        assert_eq!(sheet.resolve(addr("A2")), Err(ComputedError::Value));
        assert_eq!(sheet.resolve(addr("Z9")), Ok(0.0));
    }

    #[test]
    fn test_shared_precedents_evaluate_once() {
        let mut sheet = Sheet::new();
        // Each row reads the previous one twice
        sheet.set_cell("A1", "1").unwrap();
        for row in 2..=64 {
            let text = format!("=A{}+A{}", row - 1, row - 1);
            sheet.set_cell(&format!("A{}", row), &text).unwrap();
        }

        assert_eq!(sheet.value("A64").unwrap(), Value::Number(2f64.powi(63)));
        sheet.set_cell("A1", "x").unwrap();
        assert_eq!(
            sheet.value("A64").unwrap(),
            Value::Error(ComputedError::Value)
        );
    }

    #[test]
    fn test_clear_keeps_referenced_record() {
        let mut sheet = Sheet::new();
        sheet.set_cell("C3", "5").unwrap();
        sheet.set_cell("A1", "=C3").unwrap();

        sheet.clear_cell("C3").unwrap();
        let c3 = sheet.cell("C3").unwrap().unwrap();
        assert!(c3.content().is_empty());
        assert!(c3.is_referenced());
        assert_eq!(sheet.printable_size(), Size::new(3, 3));

        sheet.clear_cell("A1").unwrap();
        assert!(sheet.cell("A1").unwrap().is_none());
        // C3 is no longer read by anything but keeps its record
        assert_eq!(sheet.printable_size(), Size::new(3, 3));

        sheet.clear_cell("C3").unwrap();
        assert!(sheet.is_empty());
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_clear_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.clear_cell("B2").unwrap();
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_invalid_addresses() {
        let mut sheet = Sheet::new();
        let outside = Address::new(16_384, 0);

        assert_eq!(
            sheet.set_cell_at(outside, "1"),
            Err(Error::InvalidAddress(outside))
        );
        assert!(sheet.cell_at(outside).is_err());
        assert!(sheet.clear_cell_at(outside).is_err());
        assert!(sheet.value_at(outside).is_err());
        assert!(matches!(
            sheet.set_cell("not a cell", "1"),
            Err(Error::InvalidAddressText(_))
        ));
        assert!(sheet.is_empty());
    }
}
