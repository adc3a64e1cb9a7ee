//! Batch input: `hostname,mac,ip` rows from a CSV file.

use std::fs;
use std::path::Path;

use dhcpd_conf::{normalize_mac, validate_ip};
use thiserror::Error;

const HEADER_NAMES: &[&str] = &["hostname", "host", "mac", "ip", "address"];

/// One input row, unvalidated. Missing columns are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub hostname: String,
    pub mac: String,
    pub ip: String,
}

/// Errors returned when reading a batch file.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read batch file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("no records found in batch file {path}")]
    Empty { path: String },
}

/// Read every data row of `path` in file order.
///
/// Rows are not validated or deduplicated here; a row with a bad MAC or IP is
/// returned as is and fails later on its own.
pub fn read_records(path: &Path) -> Result<Vec<BatchRow>, BatchError> {
    let raw = fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rows = parse_rows(&raw);
    if rows.is_empty() {
        return Err(BatchError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(rows)
}

/// Parse CSV text, dropping a header row if one is detected.
pub fn parse_rows(raw: &str) -> Vec<BatchRow> {
    let mut rows: Vec<(usize, Vec<String>)> = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, split_fields(line)))
        .collect();

    if rows.first().is_some_and(|(_, fields)| is_header(fields)) {
        rows.remove(0);
    }

    rows.into_iter()
        .map(|(line, fields)| {
            let field = |idx: usize| fields.get(idx).map_or(String::new(), |f| f.trim().to_string());
            BatchRow {
                line,
                hostname: field(0),
                mac: field(1),
                ip: field(2),
            }
        })
        .collect()
}

fn is_header(fields: &[String]) -> bool {
    let looks_like_data = fields.len() >= 3
        && normalize_mac(&fields[1]).is_some()
        && validate_ip(fields[2].trim());
    if looks_like_data {
        return false;
    }
    fields
        .iter()
        .any(|field| HEADER_NAMES.contains(&field.trim().to_ascii_lowercase().as_str()))
}

/// Split one CSV line, honoring double-quoted fields.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
