//! Raw CSV loading.
//!
//! Reads the annual 311 export files and concatenates their rows in
//! input order. Every column is read as an optional string; semantic
//! parsing (timestamps, coordinates) happens in the normalizer, so a
//! malformed cell never aborts a whole file.

use std::path::Path;

use serde::Deserialize;

use crate::IngestError;

/// One raw row from a 311 export, prior to any validation.
///
/// The exports carry many more columns (neighborhood, source channel,
/// SLA targets, ...); serde ignores the ones not named here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComplaintRow {
    /// Source category label.
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    /// Free-text case title.
    pub case_title: Option<String>,
    /// Free-text subject (department) field.
    pub subject: Option<String>,
    /// Opening timestamp, unparsed.
    pub open_dt: Option<String>,
    /// Closing timestamp, unparsed.
    pub closed_dt: Option<String>,
    /// Latitude, unparsed.
    pub latitude: Option<String>,
    /// Longitude, unparsed.
    pub longitude: Option<String>,
}

/// Loads and concatenates the given CSV files into a single row set.
///
/// Rows that fail to deserialize (truncated lines, stray quoting) are
/// skipped with a warning rather than failing the batch.
///
/// # Errors
///
/// Returns [`IngestError`] if a file cannot be opened or its header row
/// cannot be read.
pub fn load_records<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawComplaintRow>, IngestError> {
    let mut rows = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let before = rows.len();
        let mut skipped: u64 = 0;

        for result in reader.deserialize::<RawComplaintRow>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    log::warn!("{}: skipping malformed row: {e}", path.display());
                }
            }
        }

        log::info!(
            "{}: read {} rows ({skipped} skipped)",
            path.display(),
            rows.len() - before
        );
    }

    Ok(rows)
}
