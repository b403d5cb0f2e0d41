//! Count-by-period aggregation functions.

use std::collections::BTreeMap;

use critter_map_analytics_models::{
    CountByAnimalType, CountByDayOfWeek, CountByMonth, CountBySeason, CountByYear,
    CountByYearMonth, CountByYearQuarter, SeasonTypeTable, TemporalAggregates,
};
use critter_map_complaint_models::{AnimalType, ComplaintRecord, Season};

/// Counts complaints by calendar year.
#[must_use]
pub fn count_by_year(records: &[ComplaintRecord]) -> CountByYear {
    let mut counts = CountByYear::new();
    for record in records {
        *counts.entry(record.year).or_insert(0) += 1;
    }
    counts
}

/// Counts complaints pivoted year x month. Every year present in the
/// data gets a full 12-month row; months with no complaints stay 0.
#[must_use]
pub fn count_by_year_month(records: &[ComplaintRecord]) -> CountByYearMonth {
    let mut rows = CountByYearMonth::new();
    for record in records {
        let row = rows.entry(record.year).or_insert([0; 12]);
        row[(record.month - 1) as usize] += 1;
    }
    rows
}

/// Counts complaints by weekday in fixed Monday-first order; days with
/// no complaints stay 0.
#[must_use]
pub fn count_by_day_of_week(records: &[ComplaintRecord]) -> CountByDayOfWeek {
    let mut counts = [0; 7];
    for record in records {
        counts[record.day_of_week.index()] += 1;
    }
    counts
}

/// Counts complaints pivoted year x quarter, zero-filled per year row.
#[must_use]
pub fn count_by_year_quarter(records: &[ComplaintRecord]) -> CountByYearQuarter {
    let mut rows = CountByYearQuarter::new();
    for record in records {
        let row = rows.entry(record.year).or_insert([0; 4]);
        row[(record.quarter - 1) as usize] += 1;
    }
    rows
}

/// Counts complaints by calendar month summed across all years.
#[must_use]
pub fn count_by_month(records: &[ComplaintRecord]) -> CountByMonth {
    let mut counts = [0; 12];
    for record in records {
        counts[(record.month - 1) as usize] += 1;
    }
    counts
}

/// Counts complaints by season.
#[must_use]
pub fn count_by_season(records: &[ComplaintRecord]) -> CountBySeason {
    let mut counts = CountBySeason::new();
    for record in records {
        *counts.entry(record.season).or_insert(0) += 1;
    }
    counts
}

/// Counts complaints by animal type.
#[must_use]
pub fn count_by_animal_type(records: &[ComplaintRecord]) -> CountByAnimalType {
    let mut counts = CountByAnimalType::new();
    for record in records {
        *counts.entry(record.animal_type).or_insert(0) += 1;
    }
    counts
}

/// Cross-tabulates season x animal type, zero-filled over every
/// (season, type) pair so chart series and report scans never have to
/// special-case absent combinations.
#[must_use]
pub fn count_by_season_and_type(records: &[ComplaintRecord]) -> SeasonTypeTable {
    let mut table: SeasonTypeTable = Season::all()
        .iter()
        .map(|season| {
            let row: BTreeMap<AnimalType, u64> =
                AnimalType::all().iter().map(|t| (*t, 0)).collect();
            (*season, row)
        })
        .collect();

    for record in records {
        if let Some(row) = table.get_mut(&record.season)
            && let Some(count) = row.get_mut(&record.animal_type)
        {
            *count += 1;
        }
    }
    table
}

/// Computes every temporal aggregate in one call. Tables are built fresh
/// per invocation; nothing is cached or shared across calls.
#[must_use]
pub fn aggregate(records: &[ComplaintRecord]) -> TemporalAggregates {
    let aggregates = TemporalAggregates {
        by_year: count_by_year(records),
        by_year_month: count_by_year_month(records),
        by_day_of_week: count_by_day_of_week(records),
        by_year_quarter: count_by_year_quarter(records),
        by_month: count_by_month(records),
        by_season: count_by_season(records),
        by_animal_type: count_by_animal_type(records),
        by_season_and_type: count_by_season_and_type(records),
    };
    log::debug!(
        "Aggregated {} records across {} years",
        aggregates.total(),
        aggregates.by_year.len()
    );
    aggregates
}
