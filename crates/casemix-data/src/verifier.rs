//! Rule evaluation over a claim table.
//!
//! Every row starts unflagged. Rules are applied in rule-set order and each
//! match writes the rule's message into the row's note. Under the default
//! [`AnnotationPolicy::LastMatchWins`] a later matching rule overwrites the
//! note of an earlier one, so the last matching rule in the list is the one
//! visible on the row.
//!
//! Matching is a literal, case-sensitive substring test on the row's value
//! in the rule's column. A rule naming a column the table does not have
//! matches nothing.

use casemix_core::models::{AnnotatedRow, ClaimTable, VerificationResult};
use casemix_core::rules::{Rule, RuleSet};
use tracing::debug;

/// How notes from several matching rules combine on one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationPolicy {
    /// Each match overwrites the note; the last matching rule wins.
    #[default]
    LastMatchWins,
    /// The first matching rule's note sticks; later matches are ignored.
    FirstMatchWins,
}

/// Apply `rules` to `table` under [`AnnotationPolicy::LastMatchWins`].
pub fn verify(table: &ClaimTable, rules: &RuleSet) -> VerificationResult {
    verify_with(table, rules, AnnotationPolicy::LastMatchWins)
}

/// Apply `rules` to `table` and return the flagged rows in input order.
///
/// The input table is not modified.
pub fn verify_with(
    table: &ClaimTable,
    rules: &RuleSet,
    policy: AnnotationPolicy,
) -> VerificationResult {
    let mut notes: Vec<Option<&str>> = vec![None; table.len()];

    for rule in rules {
        let Some(matched) = matching_rows(table, rule) else {
            debug!(rule = %rule.name, column = %rule.column, "column absent; rule matches nothing");
            continue;
        };
        let mut hits = 0usize;
        for idx in matched {
            hits += 1;
            let note = &mut notes[idx];
            if policy == AnnotationPolicy::LastMatchWins || note.is_none() {
                *note = Some(rule.message.as_str());
            }
        }
        debug!(rule = %rule.name, hits, "rule applied");
    }

    let rows = table
        .rows()
        .iter()
        .zip(notes)
        .filter_map(|(row, note)| {
            note.filter(|n| !n.is_empty()).map(|n| AnnotatedRow {
                note: n.to_string(),
                row: row.clone(),
            })
        })
        .collect();

    VerificationResult {
        columns: table.columns().to_vec(),
        rows,
    }
}

/// Number of rows each rule matches on its own, in rule-set order.
pub fn rule_hits(table: &ClaimTable, rules: &RuleSet) -> Vec<usize> {
    rules
        .iter()
        .map(|rule| matching_rows(table, rule).map_or(0, |m| m.count()))
        .collect()
}

/// Indices of rows whose value in `rule.column` contains the pattern, or
/// `None` when the column is absent.
fn matching_rows<'a>(
    table: &'a ClaimTable,
    rule: &'a Rule,
) -> Option<impl Iterator<Item = usize> + 'a> {
    let values = table.column_values(&rule.column)?;
    Some(
        values
            .enumerate()
            .filter(move |(_, value)| rule.matches(value))
            .map(|(idx, _)| idx),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
