//! CSV table parsing shared by every source.
//!
//! Turns CSV bytes into one [`RawRecord`] per data row. Every cell becomes
//! a JSON string; numeric coercion is left to the normalizer.

use crate::{RawRecord, SourceError};

/// UTF-8 byte order mark written by spreadsheet exports (`utf-8-sig`).
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses a CSV table with a header row into raw records.
///
/// Rows shorter than the header are padded with empty strings, extra
/// cells are ignored, and rows whose cells are all blank are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] on malformed CSV and
/// [`SourceError::Parse`] when the table has no header row.
pub fn parse_csv_table(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRecord>, SourceError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Parse {
            message: "CSV table contains no header row".to_owned(),
        });
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut map = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(i).unwrap_or("").trim().to_owned();
            map.insert(header.clone(), serde_json::Value::String(value));
        }
        records.push(serde_json::Value::Object(map));
    }

    log::debug!("Parsed {} rows with {} columns", records.len(), headers.len());

    Ok(records)
}
