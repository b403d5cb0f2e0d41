#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic findings report synthesis.
//!
//! Consumes the temporal aggregates and the cluster summary and derives
//! the superlative facts (peak/quietest periods, top animal types,
//! dominant type per cluster and per season, the year-over-year trend),
//! each carried both as a structured [`Fact`] and as one rendered
//! sentence. The same inputs always produce the same report.

pub mod synthesize;

use chrono::NaiveDate;
use critter_map_complaint_models::{AnimalType, Season};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use synthesize::synthesize;

/// Default Top-N size for the animal-type ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Errors that can occur during report synthesis.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A superlative was requested over an empty aggregation. The
    /// statistic name identifies which input was empty.
    #[error("cannot derive {statistic}: the aggregation it depends on is empty")]
    EmptyAggregation {
        /// Human-readable name of the missing statistic.
        statistic: &'static str,
    },
}

/// Direction of the year-over-year trend statement.
///
/// The comparison is a strict-greater test of the last year's total
/// against the first year's; equal totals land in `Decreasing`. That
/// asymmetry is carried over from the historical report deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    /// Last year's total strictly exceeds the first year's.
    Increasing,
    /// Last year's total is at or below the first year's.
    Decreasing,
}

/// One derived fact, structured for programmatic consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fact {
    /// Grand total of analyzed complaints.
    TotalComplaints {
        /// Record count.
        total: u64,
    },
    /// Year with the most complaints.
    PeakYear {
        /// Year.
        year: i32,
        /// Complaints in that year.
        count: u64,
    },
    /// Year with the fewest complaints.
    QuietestYear {
        /// Year.
        year: i32,
        /// Complaints in that year.
        count: u64,
    },
    /// One entry of the Top-N animal type ranking.
    TopAnimalType {
        /// 1-based rank.
        rank: usize,
        /// Animal type.
        animal_type: AnimalType,
        /// Complaints of that type.
        count: u64,
        /// Share of the grand total, rounded to one decimal.
        percent: f64,
    },
    /// Number of geographic clusters identified.
    ClusterCount {
        /// Cluster count.
        clusters: usize,
    },
    /// Dominant animal type within one cluster.
    ClusterDominantType {
        /// Cluster id.
        cluster: usize,
        /// Dominant animal type.
        animal_type: AnimalType,
        /// Complaints of that type in the cluster.
        count: u64,
        /// Cluster centroid latitude.
        latitude: f64,
        /// Cluster centroid longitude.
        longitude: f64,
    },
    /// Season with the most complaints across all categories.
    PeakSeason {
        /// Season.
        season: Season,
        /// Complaints in that season.
        count: u64,
    },
    /// Dominant animal type within one season.
    SeasonDominantType {
        /// Season.
        season: Season,
        /// Dominant animal type.
        animal_type: AnimalType,
        /// Complaints of that type in the season.
        count: u64,
    },
    /// Year-over-year trend statement.
    Trend {
        /// Trend direction.
        direction: TrendDirection,
        /// First year in the data.
        first_year: i32,
        /// Complaints in the first year.
        first_count: u64,
        /// Last year in the data.
        last_year: i32,
        /// Complaints in the last year.
        last_count: u64,
    },
    /// Recommendation to focus on the most-reported animal type.
    FocusRecommendation {
        /// Most-reported animal type.
        animal_type: AnimalType,
    },
    /// Recommendation to target high-volume clusters.
    GeographicRecommendation,
    /// Recommendation to staff up for the peak season.
    SeasonalRecommendation {
        /// Peak season.
        season: Season,
        /// Dominant animal type within it.
        animal_type: AnimalType,
    },
}

/// One derived fact plus its rendered sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Structured fact.
    pub fact: Fact,
    /// Human-readable sentence.
    pub sentence: String,
}

/// A titled group of findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Optional lead-in line before the list.
    pub intro: Option<String>,
    /// Render findings as a numbered list instead of bullets.
    pub ordered: bool,
    /// The findings, in presentation order.
    pub findings: Vec<Finding>,
}

/// The synthesized findings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Document title.
    pub title: String,
    /// Date the report was generated.
    pub generated_on: NaiveDate,
    /// Ordered sections.
    pub sections: Vec<Section>,
}

impl Report {
    /// Renders the report as Markdown: `#`/`##` headers, bullet or
    /// numbered lists per section, and a generation-date footer.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);

        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n", section.title));
            if let Some(intro) = &section.intro {
                out.push_str(&format!("{intro}\n\n"));
            }
            for (i, finding) in section.findings.iter().enumerate() {
                if section.ordered {
                    out.push_str(&format!("{}. {}\n", i + 1, finding.sentence));
                } else {
                    out.push_str(&format!("- {}\n", finding.sentence));
                }
            }
        }

        out.push_str(&format!(
            "\n*Report generated on {}*\n",
            self.generated_on.format("%Y-%m-%d")
        ));
        out
    }
}
