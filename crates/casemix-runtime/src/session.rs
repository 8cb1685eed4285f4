//! Single-user review session.
//!
//! A [`Session`] owns the loaded claim table, the rule set and the last
//! verification result. The result is cached together with the table and
//! rule-set generations it was computed from; any change to either makes it
//! stale, and stale results are never handed out. Callers get a fresh one
//! through [`Session::verification`], which recomputes on demand.
//!
//! # Example
//! ```no_run
//! use casemix_runtime::session::Session;
//! use casemix_core::rules::Rule;
//!
//! let mut session = Session::new();
//! session.load(std::path::Path::new("klaim.txt")).unwrap();
//! session.add_rule(Rule::new("z09", "DIAGLIST", "Z09", "Check Z09").unwrap());
//! println!("flagged: {}", session.verification().len());
//! ```

use std::path::{Path, PathBuf};

use casemix_core::error::{CasemixError, Result};
use casemix_core::models::{ClaimTable, VerificationResult};
use casemix_core::rules::{Rule, RuleSet};
use casemix_data::aggregator::{build_summary, ClaimSummary};
use casemix_data::deriver::derive_columns;
use casemix_data::reader::{is_claim_file, load_claim_table};
use casemix_data::verifier::{rule_hits, verify_with, AnnotationPolicy};
use casemix_data::writer::write_verification;

/// A verification result and the generations it was computed from.
#[derive(Debug)]
struct CachedVerification {
    table_generation: u64,
    rules_generation: u64,
    result: VerificationResult,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Table, rules and cached verification for one user.
#[derive(Debug, Default)]
pub struct Session {
    /// File the current table was loaded from, if any.
    source: Option<PathBuf>,
    /// Raw table as loaded. Derived columns are computed on read.
    table: ClaimTable,
    rules: RuleSet,
    /// How notes from several matching rules combine.
    policy: AnnotationPolicy,
    /// Bumped whenever the table is replaced.
    table_generation: u64,
    /// Bumped whenever a rule is added or removed or the policy changes.
    rules_generation: u64,
    cache: Option<CachedVerification>,
    /// Human-readable description of the last failed operation.
    last_error: Option<String>,
}

impl Session {
    /// Empty session: no table, no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with `rules`.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Use `policy` instead of [`AnnotationPolicy::LastMatchWins`].
    pub fn with_policy(mut self, policy: AnnotationPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Table ─────────────────────────────────────────────────────────────

    /// Load `path` as the session's table, replacing the previous one.
    ///
    /// On failure the previous table is kept, the error is recorded in
    /// [`last_error`](Self::last_error) and returned. Returns the number of
    /// loaded rows on success.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        if !is_claim_file(path) {
            tracing::warn!(
                "{} is not a .txt/.tsv/.csv file; reading it as tab-delimited anyway",
                path.display()
            );
        }
        match load_claim_table(path) {
            Ok(table) => {
                let rows = table.len();
                self.replace_table(table);
                self.source = Some(path.to_path_buf());
                Ok(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed; keeping previous table");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-read the file the current table came from.
    pub fn reload(&mut self) -> Result<usize> {
        let Some(source) = self.source.clone() else {
            let err = CasemixError::Config("no input file to reload".to_string());
            self.last_error = Some(err.to_string());
            return Err(err);
        };
        self.load(&source)
    }

    /// Replace the table wholesale. Rules are kept.
    pub fn replace_table(&mut self, table: ClaimTable) {
        self.table = table;
        self.table_generation += 1;
        self.last_error = None;
        tracing::debug!(
            generation = self.table_generation,
            rows = self.table.len(),
            "table replaced"
        );
    }

    /// Raw table as loaded.
    pub fn table(&self) -> &ClaimTable {
        &self.table
    }

    /// Table with the derived code-part and tariff-delta columns.
    pub fn derived_table(&self) -> ClaimTable {
        derive_columns(&self.table)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    // ── Rules ─────────────────────────────────────────────────────────────

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Append a rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.add(rule);
        self.rules_generation += 1;
    }

    /// Remove the rule at `index`. Out of range leaves everything as is,
    /// records the error and returns it.
    pub fn remove_rule(&mut self, index: usize) -> Result<Rule> {
        match self.rules.remove(index) {
            Ok(rule) => {
                self.rules_generation += 1;
                Ok(rule)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn policy(&self) -> AnnotationPolicy {
        self.policy
    }

    /// Switch the annotation policy. A change invalidates the cached result.
    pub fn set_policy(&mut self, policy: AnnotationPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.rules_generation += 1;
        }
    }

    /// Rows each rule matches on its own, against the derived table.
    pub fn rule_hits(&self) -> Vec<usize> {
        rule_hits(&self.derived_table(), &self.rules)
    }

    // ── Verification ──────────────────────────────────────────────────────

    /// `true` when no cached result matches the current table and rules.
    pub fn is_stale(&self) -> bool {
        self.current().is_none()
    }

    /// Cached result, only if it is still current.
    pub fn cached_verification(&self) -> Option<&VerificationResult> {
        self.current()
    }

    /// Current verification result, recomputed if stale.
    pub fn verification(&mut self) -> &VerificationResult {
        self.refresh()
    }

    /// Dashboard summary over the derived table and a fresh verification.
    pub fn summary(&mut self, top_n: usize) -> ClaimSummary {
        self.refresh();
        build_summary(&self.derived_table(), self.current(), top_n)
    }

    /// Write the current verification result to `path`. Returns the number
    /// of exported rows.
    pub fn export(&mut self, path: &Path) -> Result<usize> {
        let outcome = {
            let result = self.refresh();
            write_verification(result, path).map(|()| result.len())
        };
        if let Err(e) = &outcome {
            self.last_error = Some(e.to_string());
        }
        outcome
    }

    /// Human-readable description of the last failed operation, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn current(&self) -> Option<&VerificationResult> {
        self.cache
            .as_ref()
            .filter(|c| {
                c.table_generation == self.table_generation
                    && c.rules_generation == self.rules_generation
            })
            .map(|c| &c.result)
    }

    /// Recompute the cached result if the table or rules changed.
    fn refresh(&mut self) -> &VerificationResult {
        let (table_generation, rules_generation) = (self.table_generation, self.rules_generation);
        let fresh = self.cache.take().filter(|c| {
            c.table_generation == table_generation && c.rules_generation == rules_generation
        });

        let cached = match fresh {
            Some(cached) => {
                tracing::debug!("returning cached verification result");
                cached
            }
            None => {
                let result = verify_with(&self.derived_table(), &self.rules, self.policy);
                tracing::debug!(
                    flagged = result.len(),
                    rules = self.rules.len(),
                    "verification recomputed"
                );
                CachedVerification {
                    table_generation,
                    rules_generation,
                    result,
                }
            }
        };
        &self.cache.insert(cached).result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
