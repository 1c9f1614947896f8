use serde::{Deserialize, Serialize};

/// Fields of one physical input line. A blank line is an empty row.
pub type Row = Vec<String>;

/// Normalized output row, bank-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    /// As exported by the bank, e.g. `08/15/2021`.
    pub date: String,
    pub description: String,
    /// Signed decimal with two places. Negative means money out.
    pub amount: String,
}

impl CanonicalRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
        }
    }

    pub fn as_record(&self) -> [&str; 3] {
        [&self.date, &self.description, &self.amount]
    }
}
