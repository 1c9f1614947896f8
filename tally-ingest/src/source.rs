//! Input sources and CSV row parsing.
//!
//! Bank exports mix `\r\n`, `\r` and `\n`; all three are normalized to `\n`
//! before parsing. A format's fixed leading lines are split off and parsed one
//! physical line at a time, since the `csv` reader drops blank lines and the
//! preamble checks depend on them. Everything after is read as one CSV stream,
//! so quoted fields may span lines.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::types::Row;

/// Read-only input. Every extractor opens its own view of it.
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Text(String),
}

/// Rows of one input, split at the end of the preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rows {
    /// Leading physical lines; a blank line is an empty row.
    pub head: Vec<Row>,
    /// Remaining records with the line each one starts on.
    pub body: Vec<(usize, Row)>,
}

impl InputSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn label(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Text(_) => "<text>".to_string(),
        }
    }

    pub fn read(&self) -> Result<String, ExtractError> {
        match self {
            Self::File(p) => Ok(fs::read_to_string(p)?),
            Self::Text(s) => Ok(s.clone()),
        }
    }

    /// Parse the input, taking the first `head_lines` physical lines apart.
    pub fn rows(&self, head_lines: usize) -> Result<Rows, ExtractError> {
        let text = normalize_newlines(&self.read()?);
        let (head, rest) = split_head(&text, head_lines);

        let head = head
            .iter()
            .enumerate()
            .map(|(i, line)| parse_line(line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let body = parse_records(rest, head.len())?;

        Ok(Rows { head, body })
    }
}

/// Strip a UTF-8 BOM and turn `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Up to `n` leading lines of `\n`-normalized text, and the text after them.
fn split_head(text: &str, n: usize) -> (Vec<&str>, &str) {
    let mut head = Vec::with_capacity(n);
    let mut rest = text;
    while head.len() < n && !rest.is_empty() {
        match rest.split_once('\n') {
            Some((line, tail)) => {
                head.push(line);
                rest = tail;
            }
            None => {
                head.push(rest);
                rest = "";
            }
        }
    }
    (head, rest)
}

/// Parse `\n`-normalized CSV text. Each row carries the 1-based line it starts
/// on, shifted by `line_offset`. Blank lines yield no row.
pub fn parse_records(text: &str, line_offset: usize) -> Result<Vec<(usize, Row)>, ExtractError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| {
            let line = line_offset + source.position().map_or(0, |p| p.line() as usize);
            ExtractError::Csv { line, source }
        })?;
        let line = line_offset + record.position().map_or(0, |p| p.line() as usize);
        out.push((line, record.iter().map(str::to_string).collect()));
    }
    Ok(out)
}

/// Parse one physical line into its fields. An empty line is an empty row.
pub fn parse_line(line: &str, line_no: usize) -> Result<Row, ExtractError> {
    Ok(parse_records(line, line_no.saturating_sub(1))?
        .into_iter()
        .next()
        .map(|(_, row)| row)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(row: &[String]) -> Vec<&str> {
        row.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_newlines("\u{feff}Date,Amount\r\n"), "Date,Amount\n");
    }

    #[test]
    fn test_head_keeps_blank_lines() {
        let rows = InputSource::text("\r\nheader\r\n\r\nrow\r\n").rows(2).unwrap();
        assert_eq!(rows.head.len(), 2);
        assert!(rows.head[0].is_empty());
        assert_eq!(fields(&rows.head[1]), vec!["header"]);
        assert_eq!(rows.body.len(), 1);
        assert_eq!(fields(&rows.body[0].1), vec!["row"]);
    }

    #[test]
    fn test_short_input_yields_short_head() {
        let rows = InputSource::text("\nDate").rows(3).unwrap();
        assert_eq!(rows.head.len(), 2);
        assert!(rows.body.is_empty());
        assert!(InputSource::text("").rows(1).unwrap().head.is_empty());
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let text = "08/14/2021,2469,SAFEWAY,\"123 MAIN ST\r\nSAN JOSE CA\",-45.67\r\n08/16/2021,2443,SHELL,X,-30.00\r\n";
        let rows = InputSource::text(text).rows(0).unwrap();
        assert_eq!(rows.body.len(), 2);
        assert_eq!(rows.body[0].1[3], "123 MAIN ST\nSAN JOSE CA");
        assert_eq!(rows.body[0].1.len(), 5);
        assert_eq!(rows.body[0].0, 1);
    }

    #[test]
    fn test_parse_line_quoting() {
        let row = parse_line(r#"02/11/2021,"SQ *MARKET, SF","say ""hi""",-1.00"#, 1).unwrap();
        assert_eq!(fields(&row), vec!["02/11/2021", "SQ *MARKET, SF", r#"say "hi""#, "-1.00"]);
    }

    #[test]
    fn test_parse_line_blank_and_trailing_commas() {
        assert!(parse_line("", 1).unwrap().is_empty());
        let row = parse_line("DEBIT,08/15/2021,,", 1).unwrap();
        assert_eq!(fields(&row), vec!["DEBIT", "08/15/2021", "", ""]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let src = InputSource::file("/nonexistent/tally/input.csv");
        assert!(matches!(src.rows(0), Err(ExtractError::Io(_))));
    }
}
