use thiserror::Error;

use crate::formats::FormatKind;

/// Month argument failed the `[01]?\d` shape check or fell outside 1..=12.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid month: {0:?} (expected 1-12)")]
pub struct InvalidMonth(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format: {0:?}")]
pub struct UnknownFormat(pub String);

/// Why a single extractor did not produce output.
///
/// These never escape the resolver: a wrong-format attempt failing to parse
/// is the normal case, so they are downgraded to "no match".
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error on line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("preamble mismatch on line {line}: {reason}")]
    Preamble { line: usize, reason: String },
    #[error("line {line}: missing column {column} (row has {len} fields)")]
    MissingColumn {
        line: usize,
        column: usize,
        len: usize,
    },
    #[error("failed to render output: {0}")]
    Render(String),
}

/// Aggregate outcome of trying every candidate format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no valid format found")]
    NoFormatMatched,
    #[error("ambiguous: multiple formats matched: {}", names(.0))]
    AmbiguousFormatMatch(Vec<FormatKind>),
}

fn names(kinds: &[FormatKind]) -> String {
    kinds
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_names_every_format() {
        let err = ResolveError::AmbiguousFormatMatch(vec![FormatKind::BoaCc, FormatKind::ChaseCc]);
        assert_eq!(
            err.to_string(),
            "ambiguous: multiple formats matched: boa_cc, chase_cc"
        );
    }

    #[test]
    fn test_invalid_month_message() {
        assert_eq!(
            InvalidMonth("13".into()).to_string(),
            "invalid month: \"13\" (expected 1-12)"
        );
    }
}
