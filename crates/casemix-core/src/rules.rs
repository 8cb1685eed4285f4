//! User-defined verification rules.
//!
//! A [`Rule`] flags every row whose value in one column contains a literal
//! substring. Rules live in an ordered [`RuleSet`]; order is significant
//! because the verifier lets later rules overwrite the notes of earlier ones.
//! Nothing here touches a claim table.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CasemixError, Result};

/// Separator between the four fields of a rule given on the command line.
pub const RULE_ARG_SEPARATOR: char = '|';

// ── Rule ──────────────────────────────────────────────────────────────────────

/// A substring-match condition on one column plus the note it attaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub column: String,
    /// Literal, case-sensitive substring. Never interpreted as a regex.
    pub pattern: String,
    pub message: String,
}

impl Rule {
    /// Build a rule, rejecting any empty field.
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self> {
        let rule = Self {
            name: name.into(),
            column: column.into(),
            pattern: pattern.into(),
            message: message.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Check that all four fields are non-empty.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("column", &self.column),
            ("pattern", &self.pattern),
            ("message", &self.message),
        ];
        for (label, value) in fields {
            if value.is_empty() {
                return Err(CasemixError::InvalidRule(format!("{label} must not be empty")));
            }
        }
        Ok(())
    }

    /// Whether `value` contains this rule's pattern.
    pub fn matches(&self, value: &str) -> bool {
        value.contains(self.pattern.as_str())
    }
}

impl FromStr for Rule {
    type Err = CasemixError;

    /// Parse `NAME|COLUMN|PATTERN|MESSAGE`. The message may itself contain
    /// the separator.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(4, RULE_ARG_SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(column), Some(pattern), Some(message)) => {
                Rule::new(name, column, pattern, message)
            }
            _ => Err(CasemixError::InvalidRule(format!(
                "expected NAME{sep}COLUMN{sep}PATTERN{sep}MESSAGE, got \"{s}\"",
                sep = RULE_ARG_SEPARATOR
            ))),
        }
    }
}

/// `clap` value parser for `--rule`.
pub fn parse_rule_arg(s: &str) -> std::result::Result<Rule, String> {
    s.parse::<Rule>().map_err(|e| e.to_string())
}

// ── RuleSet ───────────────────────────────────────────────────────────────────

/// Ordered, mutable collection of rules. Names need not be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule` to the end. No de-duplication.
    pub fn add(&mut self, rule: Rule) {
        debug!(name = %rule.name, column = %rule.column, "rule added");
        self.rules.push(rule);
    }

    /// Remove and return the rule at `index`, shifting later rules down.
    ///
    /// An out-of-range index leaves the set untouched and returns
    /// [`CasemixError::RuleIndexOutOfRange`].
    pub fn remove(&mut self, index: usize) -> Result<Rule> {
        if index >= self.rules.len() {
            warn!(index, len = self.rules.len(), "ignoring out-of-range rule removal");
            return Err(CasemixError::RuleIndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        let removed = self.rules.remove(index);
        debug!(name = %removed.name, index, "rule removed");
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // ── Rules file ────────────────────────────────────────────────────────

    /// Load a JSON array of rules. Every rule is validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CasemixError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let set: RuleSet =
            serde_json::from_str(&content).map_err(|source| CasemixError::RulesFile {
                path: path.to_path_buf(),
                source,
            })?;
        for rule in &set.rules {
            rule.validate()?;
        }
        debug!("Loaded {} rules from {}", set.len(), path.display());
        Ok(set)
    }

    /// Atomically write the rules as pretty JSON, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
