//! Bank of America exports.
//!
//! Credit card (header row, then contents):
//!   Posted Date,Reference Number,Payee,Address,Amount
//!
//! Checking starts with a blank line, the header and an opening balance row
//! that carries no amount:
//!
//!   Date,Description,Amount,Running Bal.
//!   08/01/2021,Beginning balance as of 08/01/2021,,"1,250.00"

use super::{FormatDescriptor, FormatKind, PreambleStep, field};
use crate::error::ExtractError;
use crate::types::{CanonicalRow, Row};

pub static BOA_CC: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::BoaCc,
    name: "boa_cc",
    summary: "Posted Date, Reference Number, Payee, Address, Amount",
    month_column: 0,
    preamble: &[],
    remap: remap_credit_card,
};

pub static BOA_CHECKING: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::BoaChecking,
    name: "boa_checking",
    summary: "(blank), Date, Description, Amount, Running Bal. + beginning balance row",
    month_column: 0,
    preamble: &[
        PreambleStep::Blank,
        PreambleStep::Exact(&["Date", "Description", "Amount", "Running Bal."]),
        PreambleStep::FieldPrefix {
            column: 1,
            prefix: "Beginning balance as of",
        },
    ],
    remap: remap_checking,
};

fn remap_credit_card(row: &Row, line: usize) -> Result<CanonicalRow, ExtractError> {
    Ok(CanonicalRow::new(
        field(row, 0, line)?,
        field(row, 2, line)?,
        field(row, 4, line)?,
    ))
}

fn remap_checking(row: &Row, line: usize) -> Result<CanonicalRow, ExtractError> {
    Ok(CanonicalRow::new(
        field(row, 0, line)?,
        field(row, 1, line)?,
        field(row, 2, line)?,
    ))
}
