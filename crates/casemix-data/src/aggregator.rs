//! Summary metrics and code-frequency breakdowns for the dashboard.
//!
//! [`summarize`] folds a claim table into tariff totals and care-type
//! counts; [`top_frequencies`] ranks the codes of a `;`-delimited list
//! column. Missing columns never fail: they contribute zeros or an empty
//! breakdown.

use std::collections::HashMap;

use casemix_core::coercion::to_number;
use casemix_core::models::{columns, ClaimTable, VerificationResult};
use serde::Serialize;

/// Number of codes shown per frequency chart unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 20;

/// Separator inside diagnosis and procedure list cells.
pub const CODE_LIST_SEPARATOR: char = ';';

// ── ClaimMetrics ──────────────────────────────────────────────────────────────

/// Headline numbers for one claim table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimMetrics {
    pub row_count: usize,
    /// Sum of `TOTAL_TARIF` after coercion.
    pub total_tariff: f64,
    /// Sum of `TARIF_RS` after coercion.
    pub hospital_tariff: f64,
    pub inpatient_count: usize,
    pub outpatient_count: usize,
    /// Rows in the supplied verification result, 0 when none was supplied.
    pub flagged_count: usize,
}

impl ClaimMetrics {
    /// `total_tariff - hospital_tariff`. Negative means under-recovery.
    pub fn tariff_delta(&self) -> f64 {
        self.total_tariff - self.hospital_tariff
    }

    /// Share of rows flagged by the verifier, in percent.
    pub fn flagged_percentage(&self) -> f64 {
        casemix_core::formatting::percentage(self.flagged_count as f64, self.row_count as f64, 1)
    }

    fn add_row(&mut self, total: &str, hospital: &str, care_type: Option<&str>) {
        self.row_count += 1;
        self.total_tariff += to_number(total);
        self.hospital_tariff += to_number(hospital);
        match care_type {
            Some(columns::INPATIENT) => self.inpatient_count += 1,
            Some(columns::OUTPATIENT) => self.outpatient_count += 1,
            _ => {}
        }
    }
}

// ── Frequencies ───────────────────────────────────────────────────────────────

/// One code and how often it occurs across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFrequency {
    pub code: String,
    pub count: usize,
}

/// Everything the dashboard shows for one table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClaimSummary {
    /// ISO-8601 timestamp when this summary was computed.
    pub generated_at: String,
    pub metrics: ClaimMetrics,
    pub top_diagnoses: Vec<CodeFrequency>,
    pub top_procedures: Vec<CodeFrequency>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Compute headline metrics for `table`.
///
/// `verification` should be the current, non-stale result for this table;
/// pass `None` when there is none and the flagged count reads 0.
///
/// The care-type counts compare the `PTD` cell exactly, so `" 1"` is
/// neither inpatient nor outpatient.
pub fn summarize(table: &ClaimTable, verification: Option<&VerificationResult>) -> ClaimMetrics {
    let care_idx = table.column_index(columns::PTD);

    let mut metrics = ClaimMetrics::default();
    for (i, row) in table.rows().iter().enumerate() {
        metrics.add_row(
            table.value(i, columns::TOTAL_TARIF),
            table.value(i, columns::TARIF_RS),
            care_idx.map(|idx| row.cell(idx)),
        );
    }
    metrics.flagged_count = verification.map_or(0, VerificationResult::len);
    metrics
}

/// Count the `;`-separated codes of `column` and return the `n` most
/// frequent, highest first.
///
/// Tokens are trimmed and empty tokens dropped. Ties keep first-seen order.
/// A missing column gives an empty list.
pub fn top_frequencies(table: &ClaimTable, column: &str, n: usize) -> Vec<CodeFrequency> {
    let Some(values) = table.column_values(column) else {
        return Vec::new();
    };

    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CodeFrequency> = Vec::new();

    for token in values
        .flat_map(|v| v.split(CODE_LIST_SEPARATOR))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        match position.get(token) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                position.insert(token, counts.len());
                counts.push(CodeFrequency {
                    code: token.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Metrics plus diagnosis and procedure breakdowns.
pub fn build_summary(
    table: &ClaimTable,
    verification: Option<&VerificationResult>,
    top_n: usize,
) -> ClaimSummary {
    ClaimSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        metrics: summarize(table, verification),
        top_diagnoses: top_frequencies(table, columns::DIAGLIST, top_n),
        top_procedures: top_frequencies(table, columns::PROCLIST, top_n),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
