//! Chart spec builders, one per aggregation view.
//!
//! The view names and titles mirror the historical analysis outputs, so
//! the rendered images drop into the same report layout.

use critter_map_analytics_models::{
    CountByAnimalType, CountByDayOfWeek, CountByMonth, CountByYear, CountByYearMonth,
    CountByYearQuarter, SeasonTypeTable, TemporalAggregates,
};
use critter_map_complaint_models::{AnimalType, ComplaintRecord, DayOfWeek, Season};
use critter_map_spatial::{ClusterAssignment, ClusterTypeTable};

use crate::{ChartData, ChartKind, ChartSeries, ChartSpec, ScatterPoint};

const COUNT_LABEL: &str = "Number of Complaints";

/// Yearly totals as a bar chart.
#[must_use]
pub fn yearly(by_year: &CountByYear) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Animal Complaints by Year".to_string(),
        x_label: "Year".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: by_year.keys().map(ToString::to_string).collect(),
            series: vec![ChartSeries {
                name: "Complaints".to_string(),
                values: by_year.values().copied().collect(),
            }],
        },
    }
}

/// Monthly counts as one line per year.
#[must_use]
pub fn monthly_by_year(by_year_month: &CountByYearMonth) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Monthly Animal Complaints by Year".to_string(),
        x_label: "Month".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: (1..=12).map(|m| m.to_string()).collect(),
            series: by_year_month
                .iter()
                .map(|(year, row)| ChartSeries {
                    name: year.to_string(),
                    values: row.to_vec(),
                })
                .collect(),
        },
    }
}

/// Day-of-week totals as a bar chart, Monday-first.
#[must_use]
pub fn day_of_week(counts: &CountByDayOfWeek) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Animal Complaints by Day of Week".to_string(),
        x_label: "Day of Week".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: DayOfWeek::all()
                .iter()
                .map(|d| d.label().to_string())
                .collect(),
            series: vec![ChartSeries {
                name: "Complaints".to_string(),
                values: counts.to_vec(),
            }],
        },
    }
}

/// Quarterly counts as bars per year, stacked by quarter.
#[must_use]
pub fn quarterly(by_year_quarter: &CountByYearQuarter) -> ChartSpec {
    let series = (0..4)
        .map(|q| ChartSeries {
            name: format!("Q{}", q + 1),
            values: by_year_quarter.values().map(|row| row[q]).collect(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::StackedBar,
        title: "Animal Complaints by Quarter and Year".to_string(),
        x_label: "Year".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: by_year_quarter.keys().map(ToString::to_string).collect(),
            series,
        },
    }
}

/// Month-of-year totals across all years, as a line.
#[must_use]
pub fn monthly_all_years(by_month: &CountByMonth) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Seasonal Pattern of Animal Complaints (All Years)".to_string(),
        x_label: "Month".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: (1..=12).map(|m| m.to_string()).collect(),
            series: vec![ChartSeries {
                name: "Complaints".to_string(),
                values: by_month.to_vec(),
            }],
        },
    }
}

/// Animal-type totals as a bar chart, most common first (taxonomy order
/// breaks ties).
#[must_use]
pub fn animal_types(by_animal_type: &CountByAnimalType) -> ChartSpec {
    let mut entries: Vec<(AnimalType, u64)> =
        by_animal_type.iter().map(|(t, c)| (*t, *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Complaints by Animal Type".to_string(),
        x_label: "Animal Type".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: entries.iter().map(|(t, _)| t.label().to_string()).collect(),
            series: vec![ChartSeries {
                name: "Complaints".to_string(),
                values: entries.iter().map(|(_, c)| *c).collect(),
            }],
        },
    }
}

/// Season totals stacked by animal type.
#[must_use]
pub fn animal_types_by_season(table: &SeasonTypeTable) -> ChartSpec {
    let series = AnimalType::all()
        .iter()
        .map(|animal| ChartSeries {
            name: animal.label().to_string(),
            values: table
                .values()
                .map(|row| row.get(animal).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::StackedBar,
        title: "Animal Types by Season".to_string(),
        x_label: "Season".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: Season::all().iter().map(|s| s.label().to_string()).collect(),
            series,
        },
    }
}

/// The geographic point cloud, colored by cluster, with centroid
/// markers. X is longitude and Y is latitude, matching map orientation.
#[must_use]
pub fn geographic_clusters(
    records: &[ComplaintRecord],
    assignment: &ClusterAssignment,
) -> ChartSpec {
    let points = records
        .iter()
        .zip(&assignment.cluster_ids)
        .map(|(record, &cluster)| ScatterPoint {
            x: record.longitude,
            y: record.latitude,
            group: cluster,
        })
        .collect();

    let markers = assignment
        .centroids
        .iter()
        .enumerate()
        .map(|(cluster, centroid)| ScatterPoint {
            x: centroid.longitude,
            y: centroid.latitude,
            group: cluster,
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Scatter,
        title: "Geographic Clusters of Animal Complaints".to_string(),
        x_label: "Longitude".to_string(),
        y_label: "Latitude".to_string(),
        data: ChartData::Points { points, markers },
    }
}

/// Cluster totals stacked by animal type.
#[must_use]
pub fn animal_types_by_cluster(table: &ClusterTypeTable) -> ChartSpec {
    let series = AnimalType::all()
        .iter()
        .map(|animal| ChartSeries {
            name: animal.label().to_string(),
            values: table
                .values()
                .map(|row| row.get(animal).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::StackedBar,
        title: "Animal Types by Geographic Cluster".to_string(),
        x_label: "Cluster".to_string(),
        y_label: COUNT_LABEL.to_string(),
        data: ChartData::Series {
            labels: table.keys().map(|c| format!("Cluster {c}")).collect(),
            series,
        },
    }
}

/// Builds every chart view the pipeline emits, keyed by view name.
#[must_use]
pub fn all_views(
    records: &[ComplaintRecord],
    aggregates: &TemporalAggregates,
    assignment: &ClusterAssignment,
    cluster_table: &ClusterTypeTable,
) -> Vec<(&'static str, ChartSpec)> {
    vec![
        ("yearly_complaints", yearly(&aggregates.by_year)),
        (
            "monthly_complaints",
            monthly_by_year(&aggregates.by_year_month),
        ),
        (
            "day_of_week_complaints",
            day_of_week(&aggregates.by_day_of_week),
        ),
        (
            "animal_type_complaints",
            animal_types(&aggregates.by_animal_type),
        ),
        (
            "quarterly_complaints",
            quarterly(&aggregates.by_year_quarter),
        ),
        ("seasonal_pattern", monthly_all_years(&aggregates.by_month)),
        (
            "animal_types_by_season",
            animal_types_by_season(&aggregates.by_season_and_type),
        ),
        (
            "geographic_clusters",
            geographic_clusters(records, assignment),
        ),
        (
            "animal_types_by_cluster",
            animal_types_by_cluster(cluster_table),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn yearly_chart_keeps_ascending_year_order() {
        let mut by_year = CountByYear::new();
        by_year.insert(2019, 1);
        by_year.insert(2018, 2);

        let spec = yearly(&by_year);
        let ChartData::Series { labels, series } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(labels, &["2018", "2019"]);
        assert_eq!(series[0].values, vec![2, 1]);
    }

    #[test]
    fn animal_type_chart_sorts_descending_with_taxonomy_tie_break() {
        let mut counts = CountByAnimalType::new();
        counts.insert(AnimalType::Dog, 3);
        counts.insert(AnimalType::Cat, 3);
        counts.insert(AnimalType::RatRodent, 7);

        let spec = animal_types(&counts);
        let ChartData::Series { labels, .. } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(labels, &["Rat/Rodent", "Dog", "Cat"]);
    }

    #[test]
    fn stacked_season_chart_has_one_series_per_type() {
        let mut table = SeasonTypeTable::new();
        for season in Season::all() {
            let row: BTreeMap<AnimalType, u64> =
                AnimalType::all().iter().map(|t| (*t, 1)).collect();
            table.insert(*season, row);
        }

        let spec = animal_types_by_season(&table);
        let ChartData::Series { labels, series } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(labels.len(), 4);
        assert_eq!(series.len(), AnimalType::all().len());
        assert!(series.iter().all(|s| s.values == vec![1, 1, 1, 1]));
    }
}
