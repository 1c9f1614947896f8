//! Read rows, consume the preamble, keep the target month, remap columns.

use crate::error::ExtractError;
use crate::formats::FormatDescriptor;
use crate::month::{MonthFilter, TargetMonth};
use crate::source::InputSource;
use crate::types::CanonicalRow;

/// Run one format over the whole input.
///
/// Any preamble mismatch, data row too short to hold the month column, or
/// remap failure aborts the run; nothing collected so far is returned.
pub fn run(
    source: &InputSource,
    format: &FormatDescriptor,
    month: TargetMonth,
) -> Result<Vec<CanonicalRow>, ExtractError> {
    let rows = source.rows(format.preamble.len())?;
    let filter = MonthFilter::new(month, format.month_column);

    for (i, step) in format.preamble.iter().enumerate() {
        let row = rows.head.get(i).ok_or_else(|| ExtractError::Preamble {
            line: rows.head.len() + 1,
            reason: "input ended before preamble".to_string(),
        })?;
        step.check(row)
            .map_err(|reason| ExtractError::Preamble { line: i + 1, reason })?;
    }

    let mut out = Vec::new();
    for (line, row) in &rows.body {
        if row.is_empty() {
            continue;
        }
        if row.len() <= filter.column() {
            return Err(ExtractError::MissingColumn {
                line: *line,
                column: filter.column(),
                len: row.len(),
            });
        }
        if filter.matches(row) {
            out.push((format.remap)(row, *line)?);
        }
    }

    Ok(out)
}

/// Write rows as `date,description,amount` CSV with `\n` line endings.
pub fn render(rows: &[CanonicalRow]) -> Result<String, ExtractError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        wtr.write_record(row.as_record())
            .map_err(|e| ExtractError::Render(e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExtractError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExtractError::Render(e.to_string()))
}
