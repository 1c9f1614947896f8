//! American Express credit card export.
//!
//! No header or preamble, rows only:
//!   02/03/2021  Wed,Reference: 320210340123456789,UBER EATS,JANE DOE,-61003,,Restaurant-Restaurant,23.45
//!
//! The date column carries a trailing weekday, and charges are exported as
//! positive amounts.

use super::{FormatDescriptor, FormatKind, field};
use crate::error::ExtractError;
use crate::types::{CanonicalRow, Row};

pub static AMEX_CC: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::AmexCc,
    name: "amex_cc",
    summary: "date+weekday, reference, description, card member, account, extended, category, amount",
    month_column: 0,
    preamble: &[],
    remap,
};

fn remap(row: &Row, line: usize) -> Result<CanonicalRow, ExtractError> {
    let date = field(row, 0, line)?
        .split_whitespace()
        .next()
        .unwrap_or_default();
    Ok(CanonicalRow::new(
        date,
        field(row, 2, line)?,
        invert_sign(field(row, 7, line)?),
    ))
}

/// Amex exports charges as positive and credits as negative; the ledger wants
/// the opposite.
pub fn invert_sign(amount: &str) -> String {
    match amount.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{amount}"),
    }
}
