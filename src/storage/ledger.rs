//! Relationship ledger
//!
//! The ledger is the single source of truth for relationships. Each row links
//! one source record field to one target id; a relationship formula stored on
//! a record selects column F of every row matching its key.

use regex::Regex;
use std::sync::OnceLock;

use crate::resolvers::formula::{DEFAULT_LEDGER_SHEET, RelationshipKey};

/// One ledger row, columns B..F
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub key: RelationshipKey,
    pub target_id: String,
}

/// A formula decoded back into the sheet it queries and the key it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormula {
    pub sheet: String,
    pub key: RelationshipKey,
}

/// Decode a relationship formula
///
/// Returns `None` for any value that is not a relationship formula, including
/// plain strings that merely start with `=`.
pub fn parse_formula(value: &str) -> Option<ParsedFormula> {
    static FORMULA_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FORMULA_REGEX.get_or_init(|| {
        Regex::new(
            r#"^=JOIN\(",", QUERY\(([^!]+)!A:F, "SELECT F WHERE B='([^']*)' AND C='([^']*)' AND D='([^']*)' and E='([^']*)'"\)\)$"#,
        )
        .unwrap()
    });

    let captures = regex.captures(value)?;
    Some(ParsedFormula {
        sheet: captures[1].to_string(),
        key: RelationshipKey::new(&captures[2], &captures[3], &captures[4], &captures[5]),
    })
}

/// Ordered collection of relationship rows
#[derive(Debug, Clone)]
pub struct RelationshipLedger {
    sheet: String,
    rows: Vec<LedgerRow>,
}

impl Default for RelationshipLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_SHEET)
    }
}

impl RelationshipLedger {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            rows: Vec::new(),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    /// Append a row
    ///
    /// Rows are never deduplicated: linking the same target twice makes it
    /// appear twice in the evaluated id list.
    pub fn link(&mut self, key: RelationshipKey, target_id: impl Into<String>) {
        self.rows.push(LedgerRow {
            key,
            target_id: target_id.into(),
        });
    }

    /// Remove every row linking `key` to `target_id`, returning how many went
    pub fn unlink(&mut self, key: &RelationshipKey, target_id: &str) -> usize {
        let before = self.rows.len();
        self.rows
            .retain(|row| !(row.key == *key && row.target_id == target_id));
        before - self.rows.len()
    }

    /// Target ids linked under `key`, in row order
    pub fn targets(&self, key: &RelationshipKey) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.key == *key)
            .map(|row| row.target_id.as_str())
            .collect()
    }

    /// Drop every row where the record appears as source or target
    pub fn remove_entity(&mut self, type_name: &str, id: &str) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| {
            let is_source = row.key.source_type == type_name && row.key.source_id == id;
            let is_target = row.key.target_type == type_name && row.target_id == id;
            !(is_source || is_target)
        });
        before - self.rows.len()
    }

    /// Evaluate a stored value the way the spreadsheet would on read
    ///
    /// Formulas against this ledger become the comma-joined target ids.
    /// Anything else, formulas against other sheets included, comes back
    /// unchanged.
    pub fn evaluate(&self, value: &str) -> Option<String> {
        let parsed = parse_formula(value)?;
        if parsed.sheet != self.sheet {
            tracing::warn!(sheet = %parsed.sheet, ledger = %self.sheet, "Formula references another sheet");
            return None;
        }
        Some(self.targets(&parsed.key).join(","))
    }
}
