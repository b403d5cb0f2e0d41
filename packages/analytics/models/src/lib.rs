#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Period-count table types produced by the temporal aggregator.
//!
//! All tables are plain integer counts over deterministic key orders:
//! `BTreeMap` for open-ended keys (years, seasons, animal types) and
//! fixed zero-filled arrays for closed calendar dimensions (months 1-12,
//! Monday-first weekdays, quarters 1-4). Superlative derivation relies on
//! that ordering for its tie-break contract.

use std::collections::BTreeMap;

use critter_map_complaint_models::{AnimalType, Season};
use serde::{Deserialize, Serialize};

/// Complaint counts keyed by calendar year.
pub type CountByYear = BTreeMap<i32, u64>;

/// Complaint counts pivoted year x month; every year row carries all 12
/// months, zero-filled.
pub type CountByYearMonth = BTreeMap<i32, [u64; 12]>;

/// Complaint counts in fixed Monday-first weekday order, zero-filled.
pub type CountByDayOfWeek = [u64; 7];

/// Complaint counts pivoted year x quarter; every year row carries all 4
/// quarters, zero-filled.
pub type CountByYearQuarter = BTreeMap<i32, [u64; 4]>;

/// Complaint counts by calendar month summed across all years,
/// zero-filled (index 0 = January).
pub type CountByMonth = [u64; 12];

/// Complaint counts keyed by season, in calendar order.
pub type CountBySeason = BTreeMap<Season, u64>;

/// Complaint counts keyed by animal type, in taxonomy order.
pub type CountByAnimalType = BTreeMap<AnimalType, u64>;

/// Season x animal-type cross-tabulation, zero-filled over every
/// (season, type) pair.
pub type SeasonTypeTable = BTreeMap<Season, CountByAnimalType>;

/// Every temporal aggregate the pipeline derives, computed in one pass
/// over the normalized record set and consumed by the chart builders and
/// the report synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAggregates {
    /// Counts by year.
    pub by_year: CountByYear,
    /// Counts pivoted year x month.
    pub by_year_month: CountByYearMonth,
    /// Counts by weekday, Monday-first.
    pub by_day_of_week: CountByDayOfWeek,
    /// Counts pivoted year x quarter.
    pub by_year_quarter: CountByYearQuarter,
    /// Counts by month across all years.
    pub by_month: CountByMonth,
    /// Counts by season.
    pub by_season: CountBySeason,
    /// Counts by animal type.
    pub by_animal_type: CountByAnimalType,
    /// Season x animal-type cross-tabulation.
    pub by_season_and_type: SeasonTypeTable,
}

impl TemporalAggregates {
    /// Total record count, taken from the yearly table.
    ///
    /// Every table sums to the same total; the yearly one is the
    /// canonical source.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.by_year.values().sum()
    }
}
