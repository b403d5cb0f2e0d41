#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic clustering of animal complaints.
//!
//! Partitions complaint coordinates into `k` spatial clusters with
//! k-means over standardized latitude/longitude, then reports centroids
//! back in original degree units. The RNG behind centroid initialization
//! is fixed-seed, so repeated runs over identical input produce
//! identical assignments; cluster ids are still only meaningful within a
//! single run, since their numbering depends on the convergence path.

use std::collections::{BTreeMap, BTreeSet};

use critter_map_complaint_models::{AnimalType, ComplaintRecord};
use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cluster count for the pipeline.
pub const DEFAULT_CLUSTERS: usize = 5;

/// Iteration cap for the k-means refinement loop. Hitting the cap ends
/// the run with the best centroids so far; it is not an error.
const MAX_ITERATIONS: u64 = 300;

/// Convergence tolerance on centroid movement.
const TOLERANCE: f64 = 1e-4;

/// Errors that can occur during clustering.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// More clusters requested than distinct coordinate points exist.
    #[error(
        "insufficient data for clustering: {requested} clusters requested, \
         {available} distinct coordinate points available"
    )]
    InsufficientData {
        /// Requested cluster count.
        requested: usize,
        /// Distinct coordinate points in the input.
        available: usize,
    },

    /// The k-means fit itself failed.
    #[error("k-means fit failed: {message}")]
    Fit {
        /// Underlying fit error.
        message: String,
    },
}

/// A cluster centroid in original coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Centroid {
    /// Centroid latitude in degrees.
    pub latitude: f64,
    /// Centroid longitude in degrees.
    pub longitude: f64,
}

/// The result of one clustering run: a cluster id per input record
/// (parallel to the record slice) plus per-cluster centroids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAssignment {
    /// Cluster id for each record, in record order; ids range over
    /// `[0, k)`.
    pub cluster_ids: Vec<usize>,
    /// Centroid for each cluster id, in original degree units.
    pub centroids: Vec<Centroid>,
}

impl ClusterAssignment {
    /// Number of clusters in this assignment.
    #[must_use]
    pub fn k(&self) -> usize {
        self.centroids.len()
    }
}

/// Cluster id -> (animal type -> count), zero-filled.
pub type ClusterTypeTable = BTreeMap<usize, BTreeMap<AnimalType, u64>>;

/// Per-cluster centroid and animal-type breakdown, the clusterer's
/// contribution to the findings report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Centroid for each cluster id, in original degree units.
    pub centroids: Vec<Centroid>,
    /// Animal-type counts per cluster, zero-filled over every
    /// (cluster, type) pair.
    pub animal_counts: ClusterTypeTable,
}

/// Partitions the records into `k` spatial clusters.
///
/// Latitude and longitude are standardized independently (zero mean,
/// unit variance over the input set; a zero-variance column is left
/// unscaled) before the k-means fit, and the resulting centroids are
/// mapped back to degrees.
///
/// # Errors
///
/// Returns [`SpatialError::InsufficientData`] if the input is empty or
/// `k` exceeds the number of distinct coordinate points, and
/// [`SpatialError::Fit`] if the k-means fit fails.
pub fn cluster_records(
    records: &[ComplaintRecord],
    k: usize,
) -> Result<ClusterAssignment, SpatialError> {
    let distinct = distinct_points(records);
    if k == 0 || distinct < k {
        return Err(SpatialError::InsufficientData {
            requested: k,
            available: distinct,
        });
    }

    let n = records.len();
    let mut coords = Array2::<f64>::zeros((n, 2));
    for (i, record) in records.iter().enumerate() {
        coords[[i, 0]] = record.latitude;
        coords[[i, 1]] = record.longitude;
    }

    // distinct >= k >= 1 guarantees a non-empty input here.
    let mean = coords
        .mean_axis(Axis(0))
        .ok_or_else(|| SpatialError::InsufficientData {
            requested: k,
            available: 0,
        })?;
    let std = coords
        .std_axis(Axis(0), 0.0)
        .mapv(|s| if s > 0.0 { s } else { 1.0 });
    let scaled = (&coords - &mean) / &std;

    let dataset = DatasetBase::new(scaled, Array1::from_elem(n, ()));
    let model = KMeans::params(k)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)
        .map_err(|e| SpatialError::Fit {
            message: e.to_string(),
        })?;

    let cluster_ids: Vec<usize> = model.predict(&dataset).iter().copied().collect();

    // Undo the standardization so centroids read as coordinates again.
    let centroids: Vec<Centroid> = model
        .centroids()
        .rows()
        .into_iter()
        .map(|row| Centroid {
            latitude: row[0].mul_add(std[0], mean[0]),
            longitude: row[1].mul_add(std[1], mean[1]),
        })
        .collect();

    let mut sizes = vec![0_u64; k];
    for &id in &cluster_ids {
        sizes[id] += 1;
    }
    log::info!("Clustered {n} records into {k} clusters (sizes: {sizes:?})");

    Ok(ClusterAssignment {
        cluster_ids,
        centroids,
    })
}

/// Cross-tabulates animal type by cluster, zero-filled over every
/// (cluster, type) pair.
///
/// `records` must be the same slice, in the same order, that produced
/// `assignment`.
#[must_use]
pub fn cross_tabulate(
    records: &[ComplaintRecord],
    assignment: &ClusterAssignment,
) -> ClusterTypeTable {
    let mut table: ClusterTypeTable = (0..assignment.k())
        .map(|cluster| {
            let row: BTreeMap<AnimalType, u64> =
                AnimalType::all().iter().map(|t| (*t, 0)).collect();
            (cluster, row)
        })
        .collect();

    for (record, &cluster) in records.iter().zip(&assignment.cluster_ids) {
        if let Some(row) = table.get_mut(&cluster)
            && let Some(count) = row.get_mut(&record.animal_type)
        {
            *count += 1;
        }
    }
    table
}

/// Builds the [`ClusterSummary`] for one clustering run.
#[must_use]
pub fn summarize(records: &[ComplaintRecord], assignment: &ClusterAssignment) -> ClusterSummary {
    ClusterSummary {
        centroids: assignment.centroids.clone(),
        animal_counts: cross_tabulate(records, assignment),
    }
}

/// Counts distinct coordinate points via their bit patterns, which is
/// exact for the parsed floats we store.
fn distinct_points(records: &[ComplaintRecord]) -> usize {
    records
        .iter()
        .map(|r| (r.latitude.to_bits(), r.longitude.to_bits()))
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(latitude: f64, longitude: f64, animal_type: AnimalType) -> ComplaintRecord {
        let open_at = NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let (year, month, day_of_week, quarter, season) =
            ComplaintRecord::calendar_fields(open_at);
        ComplaintRecord {
            id: 0,
            case_type: "Animal Bite".to_string(),
            case_title: None,
            subject: None,
            open_at,
            closed_at: None,
            latitude,
            longitude,
            year,
            month,
            day_of_week,
            quarter,
            season,
            animal_type,
        }
    }

    fn two_neighborhoods() -> Vec<ComplaintRecord> {
        vec![
            // Downtown group
            record(42.360, -71.060, AnimalType::Dog),
            record(42.361, -71.059, AnimalType::Dog),
            record(42.359, -71.061, AnimalType::RatRodent),
            // Distant group
            record(42.280, -71.120, AnimalType::Cat),
            record(42.281, -71.121, AnimalType::Cat),
            record(42.279, -71.119, AnimalType::Cat),
        ]
    }

    #[test]
    fn clustering_is_deterministic() {
        let records = two_neighborhoods();
        let first = cluster_records(&records, 2).unwrap();
        let second = cluster_records(&records, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn respects_k_and_assigns_every_record() {
        let records = two_neighborhoods();
        let assignment = cluster_records(&records, 2).unwrap();

        assert_eq!(assignment.cluster_ids.len(), records.len());
        assert_eq!(assignment.k(), 2);
        let distinct: BTreeSet<usize> = assignment.cluster_ids.iter().copied().collect();
        assert_eq!(distinct.len(), 2);
        assert!(assignment.cluster_ids.iter().all(|&id| id < 2));
    }

    #[test]
    fn separates_well_spaced_groups() {
        let records = two_neighborhoods();
        let assignment = cluster_records(&records, 2).unwrap();

        let downtown = assignment.cluster_ids[0];
        assert!(assignment.cluster_ids[..3].iter().all(|&id| id == downtown));
        assert!(assignment.cluster_ids[3..].iter().all(|&id| id != downtown));
    }

    #[test]
    fn single_cluster_centroid_is_the_mean() {
        let records = vec![
            record(42.36, -71.06, AnimalType::OtherAnimal),
            record(42.37, -71.05, AnimalType::OtherAnimal),
            record(42.35, -71.07, AnimalType::OtherAnimal),
        ];
        let assignment = cluster_records(&records, 1).unwrap();

        assert!(assignment.cluster_ids.iter().all(|&id| id == 0));
        let centroid = assignment.centroids[0];
        assert!((centroid.latitude - 42.36).abs() < 1e-9);
        assert!((centroid.longitude + 71.06).abs() < 1e-9);
    }

    #[test]
    fn insufficient_data_is_fatal() {
        let records = vec![
            record(42.36, -71.06, AnimalType::Dog),
            record(42.36, -71.06, AnimalType::Dog),
        ];
        // Two records but only one distinct point.
        let err = cluster_records(&records, 2).unwrap_err();
        match err {
            SpatialError::InsufficientData {
                requested,
                available,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            SpatialError::Fit { .. } => panic!("expected InsufficientData, got {err}"),
        }

        assert!(cluster_records(&[], 1).is_err());
        assert!(cluster_records(&records, 0).is_err());
    }

    #[test]
    fn cross_tabulation_row_sums_match_cluster_sizes() {
        let records = two_neighborhoods();
        let assignment = cluster_records(&records, 2).unwrap();
        let table = cross_tabulate(&records, &assignment);

        for (cluster, row) in &table {
            let size = assignment
                .cluster_ids
                .iter()
                .filter(|&&id| id == *cluster)
                .count() as u64;
            assert_eq!(row.values().sum::<u64>(), size);
            // Zero-filled over the whole taxonomy.
            assert_eq!(row.len(), AnimalType::all().len());
        }
    }

    #[test]
    fn summary_carries_centroids_and_counts() {
        let records = two_neighborhoods();
        let assignment = cluster_records(&records, 2).unwrap();
        let summary = summarize(&records, &assignment);

        assert_eq!(summary.centroids, assignment.centroids);
        assert_eq!(summary.animal_counts.len(), 2);
        let total: u64 = summary
            .animal_counts
            .values()
            .flat_map(BTreeMap::values)
            .sum();
        assert_eq!(total, records.len() as u64);
    }
}
