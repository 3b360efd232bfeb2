//! Request-scoped grid model for one uploaded sheet.
//!
//! A [`ValuationGrid`] is built fresh per upload and lives for one validation
//! run. Diagnostics are structured per-cell records: each [`CellRecord`]
//! holds the untouched original, the current value (only the date rule
//! rewrites it), and the ordered violation trail. The pipe-joined rendering
//! happens at the presentation boundary via [`CellRecord::annotated`].

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::utils::append_message;

/// Rule family a flag belongs to. The first rule to flag a cell decides its
/// category; the `Consistency` category feeds the aggregator's catch-all
/// count for cross-field mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Mandatory,
    FinalValue,
    DateFormat,
    AssetUsageRange,
    ValueBaseRange,
    MarketApproach,
    CostApproach,
    ProductionCapacity,
    Consistency,
}

/// Typed flag key: 0-based data-row index plus column name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: usize,
    pub field: String,
}

impl CellRef {
    pub fn new(row: usize, field: &str) -> Self {
        CellRef {
            row,
            field: field.to_string(),
        }
    }
}

/// Sparse highlight map. Ordered so rendering and summaries are stable.
pub type FlagMap = BTreeMap<CellRef, RuleCategory>;

/// One cell's data plus its accumulated diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    original: String,
    value: String,
    messages: Vec<String>,
}

impl CellRecord {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        CellRecord {
            original: raw.clone(),
            value: raw,
            messages: Vec::new(),
        }
    }

    /// The raw upload text, untouched for the lifetime of the request.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The current text. Equal to the original unless a rule rewrote it
    /// (the date auto-fix is the only rewriter).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn push_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    /// Rewrite the current value without recording a violation.
    pub fn rewrite_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Render the `value | message1 | message2 ...` trail. An original that
    /// is blank or a literal "nan" is replaced by the first message.
    pub fn annotated(&self) -> String {
        self.messages
            .iter()
            .fold(self.value.clone(), |text, message| {
                append_message(&text, message)
            })
    }
}

/// Header plus data rows, aligned positionally, with a column-name index.
#[derive(Debug, Clone)]
pub struct ValuationGrid {
    header: Vec<String>,
    rows: Vec<Vec<CellRecord>>,
    columns: HashMap<String, usize>,
}

impl ValuationGrid {
    /// Build a grid from raw upload text. Rows shorter than the header are
    /// padded with empty cells; surplus cells beyond the header are dropped.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

        let columns = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();

        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<CellRecord> =
                    row.into_iter().take(width).map(CellRecord::new).collect();
                while cells.len() < width {
                    cells.push(CellRecord::new(""));
                }
                cells
            })
            .collect();

        ValuationGrid {
            header,
            rows,
            columns,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<CellRecord>] {
        &self.rows
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn cell(&self, row: usize, field: &str) -> Option<&CellRecord> {
        let column = self.column_index(field)?;
        self.rows.get(row)?.get(column)
    }

    pub fn cell_mut(&mut self, row: usize, field: &str) -> Option<&mut CellRecord> {
        let column = self.column_index(field)?;
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Current text of a cell, or "" when the column is absent. Keeps rule
    /// code free of per-lookup Option plumbing.
    pub fn value(&self, row: usize, field: &str) -> &str {
        self.cell(row, field).map(CellRecord::value).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_are_padded_to_header_width() {
        let grid = ValuationGrid::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec!["1".into()]],
        );

        assert_eq!(grid.value(0, "a"), "1");
        assert_eq!(grid.value(0, "b"), "");
        assert_eq!(grid.value(0, "c"), "");
    }

    #[test]
    fn test_surplus_cells_are_dropped() {
        let grid = ValuationGrid::new(
            vec!["a".into()],
            vec![vec!["1".into(), "overflow".into()]],
        );

        assert_eq!(grid.rows()[0].len(), 1);
    }

    #[test]
    fn test_annotated_preserves_original_prefix() {
        let mut cell = CellRecord::new("5.5");
        cell.push_message("must be a non-decimal integer");
        cell.push_message("out of range");

        assert_eq!(
            cell.annotated(),
            "5.5 | must be a non-decimal integer | out of range"
        );
        assert_eq!(cell.original(), "5.5");
    }

    #[test]
    fn test_annotated_replaces_blank_original() {
        let mut cell = CellRecord::new("");
        cell.push_message("mandatory and cannot be empty");

        assert_eq!(cell.annotated(), "mandatory and cannot be empty");
    }

    #[test]
    fn test_rewrite_keeps_original() {
        let mut cell = CellRecord::new("2024-03-07");
        cell.rewrite_value("07-03-2024");

        assert_eq!(cell.value(), "07-03-2024");
        assert_eq!(cell.original(), "2024-03-07");
        assert_eq!(cell.annotated(), "07-03-2024");
    }

    #[test]
    fn test_flag_map_first_writer_wins() {
        let mut flags = FlagMap::new();
        flags
            .entry(CellRef::new(0, "final_value"))
            .or_insert(RuleCategory::Mandatory);
        flags
            .entry(CellRef::new(0, "final_value"))
            .or_insert(RuleCategory::FinalValue);

        assert_eq!(
            flags.get(&CellRef::new(0, "final_value")),
            Some(&RuleCategory::Mandatory)
        );
        assert_eq!(flags.len(), 1);
    }
}
