//! Format detection: run every candidate format and accept the result only
//! when exactly one of them produces valid output.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ResolveError;
use crate::formats::FormatKind;
use crate::month::TargetMonth;
use crate::source::{InputSource, parse_records};
use crate::validate::is_valid_output;

/// The single accepted normalization of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub format: FormatKind,
    pub rows: usize,
    csv: String,
}

impl Conversion {
    pub fn csv(&self) -> &str {
        &self.csv
    }

    pub fn into_csv(self) -> String {
        self.csv
    }

    pub fn write_to(&self, mut out: impl Write) -> std::io::Result<()> {
        out.write_all(self.csv.as_bytes())?;
        out.flush()
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, &self.csv)
    }
}

/// Detect the format of `source` and normalize it for `month`.
///
/// With `only` set, just that format is tried. Multiple matches are an error
/// naming every match; there is no tie-break.
pub fn resolve(
    source: &InputSource,
    month: TargetMonth,
    only: Option<FormatKind>,
) -> Result<Conversion, ResolveError> {
    let candidates: Vec<FormatKind> = match only {
        Some(kind) => vec![kind],
        None => FormatKind::ALL.to_vec(),
    };

    let mut matches: Vec<(FormatKind, String)> = candidates
        .into_iter()
        .filter_map(|kind| kind.extract(source, month).map(|csv| (kind, csv)))
        .collect();

    debug!(
        input = %source.label(),
        month = month.number(),
        matched = ?matches.iter().map(|(k, _)| k.name()).collect::<Vec<_>>(),
        "format detection finished"
    );

    match matches.len() {
        0 => Err(ResolveError::NoFormatMatched),
        1 => {
            let (format, csv) = matches.remove(0);
            let rows = count_rows(&csv);
            info!(format = format.name(), rows, "detected format");
            Ok(Conversion { format, rows, csv })
        }
        _ => Err(ResolveError::AmbiguousFormatMatch(
            matches.into_iter().map(|(k, _)| k).collect(),
        )),
    }
}

/// Records in rendered output; a quoted description may span lines.
fn count_rows(csv: &str) -> usize {
    parse_records(csv, 0).map_or(0, |records| records.len())
}

/// What a single format made of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Matched { rows: usize },
    /// Ran to completion but produced no rows or rows of the wrong shape.
    Rejected { rows: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Probe {
    pub format: FormatKind,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Per-format diagnostics for every registered format.
pub fn probe(source: &InputSource, month: TargetMonth) -> Vec<Probe> {
    FormatKind::ALL
        .into_iter()
        .map(|format| {
            let outcome = match format.try_extract(source, month) {
                Ok(csv) if is_valid_output(&csv) => Outcome::Matched {
                    rows: count_rows(&csv),
                },
                Ok(csv) => Outcome::Rejected {
                    rows: count_rows(&csv),
                },
                Err(e) => Outcome::Failed {
                    reason: e.to_string(),
                },
            };
            Probe { format, outcome }
        })
        .collect()
}
