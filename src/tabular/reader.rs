//! Turn CSV text or JSON payloads into [`Row`]s.

use csv::{ReaderBuilder, Trim};
use serde_json::Value;

use super::row::Row;
use crate::error::{ImportError, Result};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read CSV text with a header row.
///
/// The delimiter is guessed from the header line. Blank lines are skipped,
/// short records get empty cells for the trailing columns so every row
/// carries the full header set, and columns with an empty header are ignored.
pub fn read_csv(text: &str) -> Result<Vec<Row>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text);

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| (h, record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    log::debug!(
        "Read {} CSV rows ({} columns, delimiter {:?})",
        rows.len(),
        headers.len(),
        delimiter as char
    );
    Ok(rows)
}

/// Pick the candidate delimiter that occurs most often, outside quotes,
/// on the first non-blank line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for b in header.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
            counts[i] += 1;
        }
    }
    let (best, count) = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(i, c)| (CANDIDATE_DELIMITERS[i], *c))
        .unwrap_or((b',', 0));
    if count == 0 {
        b','
    } else {
        best
    }
}

/// Convert a JSON tabular payload into rows.
///
/// Accepts a bare array of flat objects, or a service envelope
/// `{"records": [{"fields": {...}}, ...]}`. Scalars are stringified,
/// nulls dropped, nested values kept as JSON text.
pub fn rows_from_json(value: &Value) -> Result<Vec<Row>> {
    let records = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("records") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                return Err(ImportError::UnsupportedFormat(
                    "expected an array of rows or a {\"records\": [...]} envelope".into(),
                ))
            }
        },
        _ => {
            return Err(ImportError::UnsupportedFormat(
                "expected an array of rows".into(),
            ))
        }
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let fields = match record {
            Value::Object(obj) => match obj.get("fields") {
                Some(Value::Object(fields)) => fields,
                _ => obj,
            },
            _ => continue,
        };
        let row: Row = fields
            .iter()
            .filter_map(|(k, v)| cell_text(v).map(|text| (k.clone(), text)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn cell_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
