//! Chase exports.
//!
//! Checking: Details,Posting Date,Description,Amount,Type,Balance,Check or Slip #
//! Credit card: Transaction Date,Post Date,Description,Category,Type,Amount,Memo
//!
//! Both lead with a header row, which never matches the month filter.

use super::{FormatDescriptor, FormatKind, field};
use crate::error::ExtractError;
use crate::types::{CanonicalRow, Row};

pub static CHASE_CHECKING: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::ChaseChecking,
    name: "chase_checking",
    summary: "Details, Posting Date, Description, Amount, Type, Balance, Check or Slip #",
    month_column: 1,
    preamble: &[],
    remap: remap_checking,
};

pub static CHASE_CC: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::ChaseCc,
    name: "chase_cc",
    summary: "Transaction Date, Post Date, Description, Category, Type, Amount, Memo",
    month_column: 0,
    preamble: &[],
    remap: remap_credit_card,
};

fn remap_checking(row: &Row, line: usize) -> Result<CanonicalRow, ExtractError> {
    Ok(CanonicalRow::new(
        field(row, 1, line)?,
        field(row, 2, line)?,
        field(row, 3, line)?,
    ))
}

fn remap_credit_card(row: &Row, line: usize) -> Result<CanonicalRow, ExtractError> {
    Ok(CanonicalRow::new(
        field(row, 0, line)?,
        field(row, 2, line)?,
        field(row, 5, line)?,
    ))
}
