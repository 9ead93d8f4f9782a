//! Relationship formula synthesis
//!
//! Relationships are never written as embedded ids. Each relationship field
//! is persisted as a spreadsheet formula that queries the relationship
//! ledger, so the stored value always reflects the live set of related ids.
//!
//! Ledger columns:
//!
//! | B           | C         | D           | E          | F         |
//! |-------------|-----------|-------------|------------|-----------|
//! | source type | source id | target type | field name | target id |

/// Sheet holding the relationship ledger
pub const DEFAULT_LEDGER_SHEET: &str = "RELATIONSHIPS";

/// Identifies the set of ledger rows behind one relationship field instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    pub source_type: String,
    pub source_id: String,
    pub target_type: String,
    pub field_name: String,
}

impl RelationshipKey {
    pub fn new(
        source_type: impl Into<String>,
        source_id: impl Into<String>,
        target_type: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            source_id: source_id.into(),
            target_type: target_type.into(),
            field_name: field_name.into(),
        }
    }
}

/// Emits relationship formulas against a given ledger sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaSynthesizer {
    ledger_sheet: String,
}

impl Default for FormulaSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_SHEET)
    }
}

impl FormulaSynthesizer {
    pub fn new(ledger_sheet: impl Into<String>) -> Self {
        Self {
            ledger_sheet: ledger_sheet.into(),
        }
    }

    pub fn ledger_sheet(&self) -> &str {
        &self.ledger_sheet
    }

    /// Build the formula for `key`
    ///
    /// The output is consumed by spreadsheet queries downstream and must stay
    /// byte-for-byte stable, including the lower-case `and` before column E.
    pub fn formula(&self, key: &RelationshipKey) -> String {
        format!(
            "=JOIN(\",\", QUERY({}!A:F, \"SELECT F WHERE B='{}' AND C='{}' AND D='{}' and E='{}'\"))",
            self.ledger_sheet, key.source_type, key.source_id, key.target_type, key.field_name
        )
    }
}

/// Build a formula against the default ledger sheet
pub fn relationship_formula(
    source_type: &str,
    source_id: &str,
    target_type: &str,
    field_name: &str,
) -> String {
    FormulaSynthesizer::default().formula(&RelationshipKey::new(
        source_type,
        source_id,
        target_type,
        field_name,
    ))
}
