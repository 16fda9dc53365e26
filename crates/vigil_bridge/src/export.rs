//! Text, CSV, and JSON renderings of a [`FingerprintTable`].
//!
//! All renderings are deterministic: rows appear in attach order and hashes
//! are always 8 lowercase hex digits, so two runs with equal fingerprints
//! produce byte-identical output.

use std::path::Path;

use vigil_common::format_hex32;

use crate::error::BridgeError;
use crate::table::{FingerprintRow, FingerprintTable};

/// Column names of the CSV header row.
pub const CSV_HEADER: [&str; 3] = ["signal", "hash", "count"];

/// Output format selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// `signal,hash,count` CSV.
    Csv,
    /// Aligned plain-text table.
    Text,
    /// Pretty-printed JSON including the seed pair.
    Json,
}

/// Renders a table in the requested format.
pub fn render(table: &FingerprintTable, format: ExportFormat) -> Result<String, BridgeError> {
    match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Text => Ok(to_text(table)),
        ExportFormat::Json => to_json(table),
    }
}

/// Renders the CSV export: header `signal,hash,count`, one `\n`-terminated
/// line per row.
pub fn to_csv(table: &FingerprintTable) -> Result<String, BridgeError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in &table.rows {
        writer.write_record([
            row.signal.as_str(),
            format_hex32(row.hash).as_str(),
            row.count.to_string().as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses rows back out of a CSV export.
pub fn from_csv(text: &str) -> Result<Vec<FingerprintRow>, BridgeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    if headers.iter().ne(CSV_HEADER) {
        return Err(BridgeError::MalformedRow {
            row: 0,
            reason: format!(
                "expected header '{}', found '{}'",
                CSV_HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let malformed = |reason: String| BridgeError::MalformedRow { row, reason };
        let (signal, hash, count) = match (record.get(0), record.get(1), record.get(2)) {
            (Some(s), Some(h), Some(c)) if record.len() == 3 => (s, h, c),
            _ => return Err(malformed(format!("expected 3 fields, found {}", record.len()))),
        };
        if hash.len() != 8 {
            return Err(malformed(format!("hash '{hash}' is not 8 hex digits")));
        }
        let hash = u32::from_str_radix(hash, 16)
            .map_err(|_| malformed(format!("hash '{hash}' is not hex")))?;
        let count = count
            .parse::<u64>()
            .map_err(|_| malformed(format!("count '{count}' is not a decimal integer")))?;
        rows.push(FingerprintRow {
            signal: signal.to_string(),
            hash,
            count,
        });
    }
    Ok(rows)
}

/// Renders an aligned plain-text table.
pub fn to_text(table: &FingerprintTable) -> String {
    let width = table
        .rows
        .iter()
        .map(|r| r.signal.chars().count())
        .chain(std::iter::once(CSV_HEADER[0].chars().count()))
        .max()
        .unwrap_or(0);
    let mut out = format!("{:<width$}  {:<8}  {}\n", "signal", "hash", "count");
    for row in &table.rows {
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            row.signal,
            format_hex32(row.hash),
            row.count
        ));
    }
    out
}

/// Renders pretty-printed JSON.
pub fn to_json(table: &FingerprintTable) -> Result<String, BridgeError> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Writes the CSV export to `path`.
pub fn write_csv_file(table: &FingerprintTable, path: &Path) -> Result<(), BridgeError> {
    write_export(table, ExportFormat::Csv, path)
}

/// Writes any export format to `path`.
pub fn write_export(
    table: &FingerprintTable,
    format: ExportFormat,
    path: &Path,
) -> Result<(), BridgeError> {
    let text = render(table, format)?;
    std::fs::write(path, text).map_err(|source| BridgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = table.len(), "wrote fingerprint export");
    Ok(())
}
