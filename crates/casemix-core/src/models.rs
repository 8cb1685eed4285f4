//! Claim table data model.
//!
//! A [`ClaimTable`] is a header plus rows of text cells. Cells are never
//! coerced in place; numeric and derived views are computed on demand by the
//! data layer. Ragged input is tolerated: a row shorter than the header
//! reads its missing cells as the empty string.

use serde::Serialize;

// ── Column names ──────────────────────────────────────────────────────────────

/// Well-known E-Klaim export column names and the derived columns.
pub mod columns {
    /// Composite INA-CBG code, `CMG-CASETYPE-CBG-SL`.
    pub const INACBG: &str = "INACBG";
    /// Claimed total tariff.
    pub const TOTAL_TARIF: &str = "TOTAL_TARIF";
    /// Hospital's own tariff.
    pub const TARIF_RS: &str = "TARIF_RS";
    /// Semicolon-delimited ICD-10 diagnosis codes.
    pub const DIAGLIST: &str = "DIAGLIST";
    /// Semicolon-delimited ICD-9-CM procedure codes.
    pub const PROCLIST: &str = "PROCLIST";
    /// Care type: [`INPATIENT`] or [`OUTPATIENT`].
    pub const PTD: &str = "PTD";

    /// `PTD` value for inpatient care (rawat inap).
    pub const INPATIENT: &str = "1";
    /// `PTD` value for outpatient care (rawat jalan).
    pub const OUTPATIENT: &str = "2";

    pub const CMG: &str = "CMG";
    pub const CASETYPE: &str = "CASETYPE";
    pub const CBG: &str = "CBG";
    pub const SL: &str = "SL";
    /// Tariff delta, `TOTAL_TARIF - TARIF_RS`.
    pub const SELISIH: &str = "Selisih";

    /// The four parts of [`INACBG`], in order.
    pub const INACBG_PARTS: [&str; 4] = [CMG, CASETYPE, CBG, SL];

    /// Header of the leading annotation column in exported results.
    pub const NOTE: &str = "note";
}

// ── ClaimRow ──────────────────────────────────────────────────────────────────

/// One claim line. Cells are positionally aligned with the owning table's
/// header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimRow {
    cells: Vec<String>,
}

impl ClaimRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, or `""` when the row is too short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Set the cell at `index`, padding with empty cells if the row is
    /// shorter than `index`.
    fn set_cell(&mut self, index: usize, value: String) {
        if self.cells.len() <= index {
            self.cells.resize(index + 1, String::new());
        }
        self.cells[index] = value;
    }
}

impl From<Vec<&str>> for ClaimRow {
    fn from(cells: Vec<&str>) -> Self {
        Self::new(cells.into_iter().map(str::to_string).collect())
    }
}

// ── ClaimTable ────────────────────────────────────────────────────────────────

/// An in-memory claim export: column names plus rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimTable {
    columns: Vec<String>,
    rows: Vec<ClaimRow>,
}

impl ClaimTable {
    /// Build a table. Cells past the header width have no column name and
    /// are dropped.
    pub fn new(columns: Vec<String>, rows: Vec<ClaimRow>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.cells.truncate(width);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor for literal tables.
    ///
    /// ```
    /// use casemix_core::models::ClaimTable;
    ///
    /// let table = ClaimTable::from_records(
    ///     &["INACBG", "TOTAL_TARIF"],
    ///     &[&["A-1-II-0", "1000"]],
    /// );
    /// assert_eq!(table.value(0, "TOTAL_TARIF"), "1000");
    /// ```
    pub fn from_records(columns: &[&str], records: &[&[&str]]) -> Self {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            records
                .iter()
                .map(|r| ClaimRow::from(r.to_vec()))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ClaimRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header. The first occurrence wins when a
    /// header repeats a name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value of `column` in row `row`, `""` if either is missing.
    pub fn value(&self, row: usize, column: &str) -> &str {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(r), Some(idx)) => r.cell(idx),
            _ => "",
        }
    }

    /// Every row's value in `column`, or `None` when the column is absent.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| r.cell(idx)))
    }

    /// Ordered `(column, value)` view of one row.
    pub fn record(&self, row: usize) -> Vec<(&str, &str)> {
        let Some(r) = self.rows.get(row) else {
            return Vec::new();
        };
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), r.cell(i)))
            .collect()
    }

    /// Return a copy with `name` set to `values`, replacing the column when
    /// it already exists and appending it otherwise.
    ///
    /// `values` is read positionally; rows past its end get `""`.
    pub fn with_column(mut self, name: &str, values: Vec<String>) -> Self {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                self.columns.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.set_cell(idx, values.next().unwrap_or_default());
        }
        self
    }
}

// ── Annotation ────────────────────────────────────────────────────────────────

/// A claim row with the note attached by the verifier. An empty note means
/// the row is unflagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRow {
    pub note: String,
    pub row: ClaimRow,
}

/// Flagged rows of a verification run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Columns of the verified table, excluding the note.
    pub columns: Vec<String>,
    pub rows: Vec<AnnotatedRow>,
}

impl VerificationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header of the exported form: `note` followed by the original columns.
    pub fn export_header(&self) -> Vec<&str> {
        std::iter::once(columns::NOTE)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Exported form of row `index`: its note followed by every cell, padded
    /// to the column count.
    pub fn export_record(&self, index: usize) -> Vec<&str> {
        let Some(annotated) = self.rows.get(index) else {
            return Vec::new();
        };
        std::iter::once(annotated.note.as_str())
            .chain((0..self.columns.len()).map(|i| annotated.row.cell(i)))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClaimTable {
        ClaimTable::from_records(
            &["SEP", "INACBG", "TOTAL_TARIF"],
            &[&["0001", "A-1-II-0", "1000"], &["0002"]],
        )
    }

    #[test]
    fn test_value_lookup() {
        let t = sample();
        assert_eq!(t.value(0, "INACBG"), "A-1-II-0");
        assert_eq!(t.value(0, "TOTAL_TARIF"), "1000");
    }

    #[test]
    fn test_ragged_row_reads_empty() {
        let t = sample();
        assert_eq!(t.value(1, "SEP"), "0002");
        assert_eq!(t.value(1, "INACBG"), "");
        assert_eq!(t.value(1, "TOTAL_TARIF"), "");
    }

    #[test]
    fn test_missing_column_and_row_read_empty() {
        let t = sample();
        assert_eq!(t.value(0, "DIAGLIST"), "");
        assert_eq!(t.value(9, "SEP"), "");
        assert!(t.column_values("DIAGLIST").is_none());
    }

    #[test]
    fn test_extra_cells_are_dropped() {
        let t = ClaimTable::from_records(&["A"], &[&["x", "overflow"]]);
        assert_eq!(t.rows()[0].cells(), &["x".to_string()]);
    }

    #[test]
    fn test_record_preserves_column_order() {
        let t = sample();
        assert_eq!(
            t.record(1),
            vec![("SEP", "0002"), ("INACBG", ""), ("TOTAL_TARIF", "")]
        );
        assert!(t.record(5).is_empty());
    }

    #[test]
    fn test_with_column_appends() {
        let t = sample().with_column("X", vec!["a".into(), "b".into()]);
        assert_eq!(t.columns().last().map(String::as_str), Some("X"));
        assert_eq!(t.value(0, "X"), "a");
        // Short row was padded before the new cell was written.
        assert_eq!(t.value(1, "X"), "b");
        assert_eq!(t.value(1, "TOTAL_TARIF"), "");
    }

    #[test]
    fn test_with_column_replaces_existing() {
        let t = sample().with_column("SEP", vec!["9".into()]);
        assert_eq!(t.columns().len(), 3);
        assert_eq!(t.value(0, "SEP"), "9");
        assert_eq!(t.value(1, "SEP"), "");
    }

    #[test]
    fn test_export_record_leads_with_note() {
        let result = VerificationResult {
            columns: vec!["A".into(), "B".into()],
            rows: vec![AnnotatedRow {
                note: "Check".into(),
                row: ClaimRow::from(vec!["1"]),
            }],
        };
        assert_eq!(result.export_header(), vec!["note", "A", "B"]);
        assert_eq!(result.export_record(0), vec!["Check", "1", ""]);
        assert!(result.export_record(1).is_empty());
    }
}
