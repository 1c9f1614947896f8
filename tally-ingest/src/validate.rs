//! Canonical output shape check.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::{normalize_newlines, parse_records};
use crate::types::CanonicalRow;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d\d?/\d\d?/(\d{2}|\d{4})$").expect("date pattern"));
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d{2}$").expect("amount pattern"));

/// Date like `8/1/21` or `08/01/2021`, non-empty description, amount like `-4.50`.
pub fn is_canonical(row: &CanonicalRow) -> bool {
    DATE_RE.is_match(&row.date) && !row.description.is_empty() && AMOUNT_RE.is_match(&row.amount)
}

/// True iff `csv` holds at least one record and every record is a canonical
/// three-field row. Empty output never counts as a detection.
pub fn is_valid_output(csv: &str) -> bool {
    let Ok(records) = parse_records(&normalize_newlines(csv), 0) else {
        return false;
    };
    !records.is_empty()
        && records.iter().all(|(_, fields)| match fields.as_slice() {
            [date, description, amount] => {
                is_canonical(&CanonicalRow::new(date, description, amount))
            }
            _ => false,
        })
}
