//! Known bank/card export layouts.
//!
//! The set is closed: each `FormatKind` maps to one static `FormatDescriptor`
//! naming the month column, the leading lines to validate and discard, and the
//! column remap into a `CanonicalRow`.

pub mod amex;
pub mod boa;
pub mod chase;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractError, UnknownFormat};
use crate::month::TargetMonth;
use crate::pipeline;
use crate::source::InputSource;
use crate::types::{CanonicalRow, Row};
use crate::validate::is_valid_output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    AmexCc,
    BoaCc,
    BoaChecking,
    ChaseChecking,
    ChaseCc,
}

impl FormatKind {
    /// Every registered format, in detection order.
    pub const ALL: [FormatKind; 5] = [
        FormatKind::AmexCc,
        FormatKind::BoaCc,
        FormatKind::BoaChecking,
        FormatKind::ChaseChecking,
        FormatKind::ChaseCc,
    ];

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            FormatKind::AmexCc => &amex::AMEX_CC,
            FormatKind::BoaCc => &boa::BOA_CC,
            FormatKind::BoaChecking => &boa::BOA_CHECKING,
            FormatKind::ChaseChecking => &chase::CHASE_CHECKING,
            FormatKind::ChaseCc => &chase::CHASE_CC,
        }
    }

    /// Run this format over `source`, returning the generated CSV only if it
    /// passes output validation. Failures are logged and reported as `None`.
    pub fn extract(self, source: &InputSource, month: TargetMonth) -> Option<String> {
        match self.try_extract(source, month) {
            Ok(csv) if is_valid_output(&csv) => Some(csv),
            Ok(_) => {
                debug!(format = self.name(), "output failed validation");
                None
            }
            Err(e) => {
                debug!(format = self.name(), error = %e, "extractor failed");
                None
            }
        }
    }

    /// Run the pipeline without validating its output.
    pub fn try_extract(
        self,
        source: &InputSource,
        month: TargetMonth,
    ) -> Result<String, ExtractError> {
        let rows = pipeline::run(source, self.descriptor(), month)?;
        pipeline::render(&rows)
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .into_iter()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// One leading line that must be present before data rows begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleStep {
    /// An empty line.
    Blank,
    /// A line whose fields equal these exactly.
    Exact(&'static [&'static str]),
    /// A line whose field at `column` starts with `prefix`.
    FieldPrefix {
        column: usize,
        prefix: &'static str,
    },
}

impl PreambleStep {
    /// `Err` carries a human-readable reason for the mismatch.
    pub fn check(&self, row: &Row) -> Result<(), String> {
        match *self {
            PreambleStep::Blank if row.is_empty() => Ok(()),
            PreambleStep::Blank => Err(format!("expected blank line, got {row:?}")),
            PreambleStep::Exact(expected) => {
                if row.iter().map(String::as_str).eq(expected.iter().copied()) {
                    Ok(())
                } else {
                    Err(format!("expected {expected:?}, got {row:?}"))
                }
            }
            PreambleStep::FieldPrefix { column, prefix } => match row.get(column) {
                Some(value) if value.starts_with(prefix) => Ok(()),
                _ => Err(format!(
                    "expected field {column} to start with {prefix:?}, got {row:?}"
                )),
            },
        }
    }
}

pub type RemapFn = fn(&Row, usize) -> Result<CanonicalRow, ExtractError>;

#[derive(Debug)]
pub struct FormatDescriptor {
    pub kind: FormatKind,
    pub name: &'static str,
    /// Layout hint shown by `tally formats`.
    pub summary: &'static str,
    pub month_column: usize,
    pub preamble: &'static [PreambleStep],
    /// Maps a data row (and its 1-based line number) to the canonical shape.
    pub remap: RemapFn,
}

/// Field `column` of `row`, or `MissingColumn`.
pub(crate) fn field(row: &Row, column: usize, line: usize) -> Result<&str, ExtractError> {
    row.get(column)
        .map(String::as_str)
        .ok_or(ExtractError::MissingColumn {
            line,
            column,
            len: row.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_and_round_trip() {
        for kind in FormatKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
            assert_eq!(kind.name().parse::<FormatKind>().unwrap(), kind);
        }
        let mut names: Vec<_> = FormatKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), FormatKind::ALL.len());
    }

    #[test]
    fn test_unknown_format_name() {
        assert_eq!(
            "wells_fargo".parse::<FormatKind>(),
            Err(UnknownFormat("wells_fargo".into()))
        );
    }

    #[test]
    fn test_serde_uses_registry_names() {
        for kind in FormatKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_preamble_step_checks() {
        let row = |f: &[&str]| -> Row { f.iter().map(|s| s.to_string()).collect() };

        assert!(PreambleStep::Blank.check(&row(&[])).is_ok());
        assert!(PreambleStep::Blank.check(&row(&["x"])).is_err());

        let header = PreambleStep::Exact(&["Date", "Amount"]);
        assert!(header.check(&row(&["Date", "Amount"])).is_ok());
        assert!(header.check(&row(&["Date", "Amount", ""])).is_err());
        assert!(header.check(&row(&["Date"])).is_err());

        let prefix = PreambleStep::FieldPrefix {
            column: 1,
            prefix: "Beginning",
        };
        assert!(prefix.check(&row(&["08/01/2021", "Beginning balance"])).is_ok());
        assert!(prefix.check(&row(&["08/01/2021"])).is_err());
    }
}
