#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for ingesting municipal 311 CSV exports and normalizing them
//! into animal-related [`ComplaintRecord`]s.
//!
//! The tabular boundary is validated here: raw columns are read as
//! optional strings, timestamps and coordinates are parsed with explicit
//! semantic types, and every row the normalizer drops is counted in a
//! [`NormalizeSummary`] so data-quality regressions stay observable.
//!
//! [`ComplaintRecord`]: critter_map_complaint_models::ComplaintRecord

pub mod classify;
pub mod export;
pub mod load;
pub mod normalize;

use thiserror::Error;

pub use classify::{classify, classify_complaint};
pub use export::{export_cleaned, import_cleaned};
pub use load::{RawComplaintRow, load_records};
pub use normalize::{NormalizeSummary, normalize};

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing or writing CSV failed at the file level.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Normalization left no records to analyze.
    #[error("no animal-related records remained after normalization ({total_raw} raw rows read)")]
    NoRecords {
        /// Raw rows read before filtering.
        total_raw: u64,
    },
}
