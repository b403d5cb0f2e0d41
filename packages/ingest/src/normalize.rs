//! Record normalization.
//!
//! Turns raw CSV rows into [`ComplaintRecord`]s: filters to
//! animal-related cases, parses timestamps and coordinates with a
//! null-on-failure contract, derives the calendar fields, and classifies
//! the animal type. Every dropped row is counted so the drop rate stays
//! observable.

use chrono::{NaiveDate, NaiveDateTime};
use critter_map_complaint_models::ComplaintRecord;

use crate::classify::classify_complaint;
use crate::load::RawComplaintRow;

/// Keywords marking a case as animal-related, tested case-insensitively
/// as substrings against the category label or the case title.
pub const ANIMAL_KEYWORDS: &[&str] = &[
    "animal", "dog", "cat", "wildlife", "bite", "rat", "rodent", "bird",
];

/// Aggregate drop counts from one normalization pass.
///
/// Rows are counted against the first filter that rejected them, in
/// filter order: animal relevance, then opening timestamp, then
/// coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Raw rows read before any filtering.
    pub total_raw: u64,
    /// Rows whose category and title matched no animal keyword.
    pub non_animal: u64,
    /// Animal-related rows with a missing or unparsable opening timestamp.
    pub missing_open_at: u64,
    /// Animal-related rows missing a parsable latitude or longitude.
    pub missing_geo: u64,
    /// Rows that became normalized records.
    pub kept: u64,
}

impl NormalizeSummary {
    /// Total rows dropped for data-quality reasons (bad timestamp or
    /// missing coordinates), excluding the non-animal filter.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.missing_open_at + self.missing_geo
    }
}

/// Normalizes raw rows into animal-related complaint records.
///
/// Malformed timestamps degrade to null and the row is excluded (never a
/// batch abort); rows without parsable coordinates are dropped. Record
/// ids are assigned sequentially in input order.
#[must_use]
pub fn normalize(rows: Vec<RawComplaintRow>) -> (Vec<ComplaintRecord>, NormalizeSummary) {
    let mut summary = NormalizeSummary {
        total_raw: rows.len() as u64,
        ..NormalizeSummary::default()
    };
    let mut records = Vec::new();

    for row in rows {
        if !is_animal_related(row.case_type.as_deref(), row.case_title.as_deref()) {
            summary.non_animal += 1;
            continue;
        }

        let Some(open_at) = row.open_dt.as_deref().and_then(parse_timestamp) else {
            summary.missing_open_at += 1;
            continue;
        };

        let (Some(latitude), Some(longitude)) = (
            parse_coordinate(row.latitude.as_deref()),
            parse_coordinate(row.longitude.as_deref()),
        ) else {
            summary.missing_geo += 1;
            continue;
        };

        let closed_at = row.closed_dt.as_deref().and_then(parse_timestamp);
        let (year, month, day_of_week, quarter, season) =
            ComplaintRecord::calendar_fields(open_at);
        let animal_type = classify_complaint(row.case_title.as_deref(), row.subject.as_deref());

        records.push(ComplaintRecord {
            id: summary.kept,
            case_type: row.case_type.unwrap_or_default(),
            case_title: row.case_title,
            subject: row.subject,
            open_at,
            closed_at,
            latitude,
            longitude,
            year,
            month,
            day_of_week,
            quarter,
            season,
            animal_type,
        });
        summary.kept += 1;
    }

    log::info!(
        "Normalized {} of {} raw rows ({} non-animal, {} missing open_at, {} missing coordinates)",
        summary.kept,
        summary.total_raw,
        summary.non_animal,
        summary.missing_open_at,
        summary.missing_geo,
    );

    (records, summary)
}

/// Returns `true` if the category label or case title matches any animal
/// keyword.
#[must_use]
pub fn is_animal_related(case_type: Option<&str>, case_title: Option<&str>) -> bool {
    [case_type, case_title].into_iter().flatten().any(|text| {
        let lower = text.to_lowercase();
        ANIMAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    })
}

/// Parses a timestamp string like `"2018-06-15 09:30:00"`.
///
/// Tries the export's space-separated format first, then the ISO 8601
/// `T` form, then a bare date at midnight. Returns `None` on failure
/// rather than raising; the caller decides whether null is fatal.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_coordinate(s: Option<&str>) -> Option<f64> {
    let value: f64 = s?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
