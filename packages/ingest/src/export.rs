//! Cleaned-table export and import.
//!
//! The normalized record set is persisted as a CSV whose columns are the
//! [`ComplaintRecord`] fields, so the dashboard (and any downstream
//! consumer) can reload exactly what the pipeline analyzed.

use std::path::Path;

use critter_map_complaint_models::ComplaintRecord;

use crate::IngestError;

/// Writes the cleaned record table to `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or a record
/// fails to serialize.
pub fn export_cleaned(records: &[ComplaintRecord], path: &Path) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("Exported {} cleaned records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a cleaned record table previously written by [`export_cleaned`].
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or any row fails
/// to deserialize; the cleaned table is our own output, so a malformed
/// row is a hard error rather than a skippable data-quality issue.
pub fn import_cleaned(path: &Path) -> Result<Vec<ComplaintRecord>, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize::<ComplaintRecord>() {
        records.push(result?);
    }
    log::info!("Imported {} cleaned records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use critter_map_complaint_models::{AnimalType, DayOfWeek, Season};

    use super::*;

    fn record(id: u64, day: u32) -> ComplaintRecord {
        let open_at = NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let (year, month, day_of_week, quarter, season) =
            ComplaintRecord::calendar_fields(open_at);
        ComplaintRecord {
            id,
            case_type: "Animal Bite".to_string(),
            case_title: Some("Dog bite".to_string()),
            subject: None,
            open_at,
            closed_at: (day % 2 == 0).then(|| open_at + chrono::Duration::hours(48)),
            latitude: 42.36,
            longitude: -71.06,
            year,
            month,
            day_of_week,
            quarter,
            season,
            animal_type: AnimalType::Dog,
        }
    }

    #[test]
    fn round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let records: Vec<ComplaintRecord> = (0..4u64).map(|i| record(i, i as u32 + 1)).collect();

        export_cleaned(&records, &path).unwrap();
        let restored = import_cleaned(&path).unwrap();

        assert_eq!(restored.len(), records.len());
        assert_eq!(restored, records);
    }

    #[test]
    fn round_trip_preserves_enum_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        export_cleaned(&[record(0, 6)], &path).unwrap();

        let restored = import_cleaned(&path).unwrap();
        assert_eq!(restored[0].day_of_week, DayOfWeek::Saturday);
        assert_eq!(restored[0].season, Season::Winter);
        assert_eq!(restored[0].animal_type, AnimalType::Dog);
    }
}
