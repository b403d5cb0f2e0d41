#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Animal complaint taxonomy and record types.
//!
//! This crate defines the canonical animal-type taxonomy used across the
//! entire critter-map system, the calendar enums derived during
//! normalization, and the [`ComplaintRecord`] entity that every downstream
//! stage (aggregation, clustering, reporting, dashboard) consumes.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The closed set of animal categories a complaint can classify into.
///
/// Declaration order is load-bearing: it matches the classifier's keyword
/// priority (rat/rodent before dog before cat, ...), and the derived `Ord`
/// makes that same order the tie-break order for superlative derivation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalType {
    /// Rat or rodent sightings and infestations
    RatRodent,
    /// Dog complaints (strays, bites, barking)
    Dog,
    /// Cat complaints
    Cat,
    /// Raccoon sightings
    Raccoon,
    /// Bird and pigeon complaints
    Bird,
    /// Squirrel complaints
    Squirrel,
    /// Coyote sightings
    Coyote,
    /// Animal-related complaints not matching a specific species
    OtherAnimal,
    /// Text gave no animal signal at all
    Unknown,
}

impl AnimalType {
    /// Returns all variants in taxonomy order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::RatRodent,
            Self::Dog,
            Self::Cat,
            Self::Raccoon,
            Self::Bird,
            Self::Squirrel,
            Self::Coyote,
            Self::OtherAnimal,
            Self::Unknown,
        ]
    }

    /// Human-readable label used in the findings report and chart legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RatRodent => "Rat/Rodent",
            Self::Dog => "Dog",
            Self::Cat => "Cat",
            Self::Raccoon => "Raccoon",
            Self::Bird => "Bird",
            Self::Squirrel => "Squirrel",
            Self::Coyote => "Coyote",
            Self::OtherAnimal => "Other Animal",
            Self::Unknown => "Unknown",
        }
    }
}

/// Season buckets derived from the complaint's opening month.
///
/// The month buckets are 1-3 Winter, 4-6 Spring, 7-9 Summer, 10-12 Fall,
/// carried over from the historical analysis' right-closed binning. The
/// derived `Ord` gives calendar order, which is also the tie-break order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    /// Months 1-3
    Winter,
    /// Months 4-6
    Spring,
    /// Months 7-9
    Summer,
    /// Months 10-12
    Fall,
}

impl Season {
    /// Returns all variants in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Fall]
    }

    /// Maps a 1-based calendar month to its season bucket.
    ///
    /// Months outside 1-12 cannot be produced by a parsed timestamp; they
    /// land in `Fall` with the rest of the final bucket.
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Self::Winter,
            4..=6 => Self::Spring,
            7..=9 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Human-readable label used in the findings report and chart legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }
}

/// Day of week a complaint was opened, Monday-first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Returns all variants in Monday-first order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Zero-based index with Monday as 0, matching the fixed chart order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used in the findings report and chart axes.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// A normalized animal-related complaint record.
///
/// Every record carries a parsed `open_at` and valid coordinates; rows
/// missing either never make it out of the normalizer. The calendar fields
/// and `animal_type` are derived during normalization, so downstream
/// stages can treat the record as complete. Field names double as the
/// column names of the exported cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Sequential id assigned by the normalizer, in input order.
    pub id: u64,
    /// Source category label (CSV column `type`).
    #[serde(rename = "type")]
    pub case_type: String,
    /// Free-text case title.
    pub case_title: Option<String>,
    /// Free-text subject (department) field.
    pub subject: Option<String>,
    /// When the case was opened.
    pub open_at: NaiveDateTime,
    /// When the case was closed, if it was.
    pub closed_at: Option<NaiveDateTime>,
    /// Complaint latitude in degrees.
    pub latitude: f64,
    /// Complaint longitude in degrees.
    pub longitude: f64,
    /// Calendar year of `open_at`.
    pub year: i32,
    /// Calendar month of `open_at` (1-12).
    pub month: u32,
    /// Day of week of `open_at`.
    pub day_of_week: DayOfWeek,
    /// Calendar quarter of `open_at` (1-4).
    pub quarter: u32,
    /// Season bucket of `open_at`.
    pub season: Season,
    /// Classified animal category.
    pub animal_type: AnimalType,
}

impl ComplaintRecord {
    /// Derives the calendar fields (`year`, `month`, `day_of_week`,
    /// `quarter`, `season`) from an opening timestamp.
    #[must_use]
    pub fn calendar_fields(open_at: NaiveDateTime) -> (i32, u32, DayOfWeek, u32, Season) {
        let month = open_at.month();
        (
            open_at.year(),
            month,
            DayOfWeek::from(open_at.weekday()),
            (month - 1) / 3 + 1,
            Season::from_month(month),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn season_buckets_match_historical_binning() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(6), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
        assert_eq!(Season::from_month(12), Season::Fall);
    }

    #[test]
    fn day_of_week_is_monday_first() {
        assert_eq!(DayOfWeek::Monday.index(), 0);
        assert_eq!(DayOfWeek::Sunday.index(), 6);
        assert_eq!(DayOfWeek::all().len(), 7);
        for (i, day) in DayOfWeek::all().iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn weekday_conversion_round_trips_through_chrono() {
        // 2018-01-01 was a Monday.
        let date = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(DayOfWeek::from(date.weekday()), DayOfWeek::Monday);
        let sunday = NaiveDate::from_ymd_opt(2018, 1, 7).unwrap();
        assert_eq!(DayOfWeek::from(sunday.weekday()), DayOfWeek::Sunday);
    }

    #[test]
    fn taxonomy_order_matches_classifier_priority() {
        let all = AnimalType::all();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], AnimalType::RatRodent);
        assert_eq!(all[8], AnimalType::Unknown);
        // Ord follows declaration order, which is the tie-break contract.
        assert!(AnimalType::RatRodent < AnimalType::Dog);
        assert!(AnimalType::Dog < AnimalType::Cat);
        assert!(AnimalType::OtherAnimal < AnimalType::Unknown);
    }

    #[test]
    fn calendar_fields_derivation() {
        let open_at = NaiveDate::from_ymd_opt(2018, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let (year, month, day, quarter, season) = ComplaintRecord::calendar_fields(open_at);
        assert_eq!(year, 2018);
        assert_eq!(month, 6);
        assert_eq!(day, DayOfWeek::Friday);
        assert_eq!(quarter, 2);
        assert_eq!(season, Season::Spring);
    }

    #[test]
    fn labels_match_report_vocabulary() {
        assert_eq!(AnimalType::RatRodent.label(), "Rat/Rodent");
        assert_eq!(AnimalType::OtherAnimal.label(), "Other Animal");
        assert_eq!(Season::Fall.label(), "Fall");
    }
}
