//! Superlative derivation and report assembly.

use chrono::NaiveDate;
use critter_map_analytics_models::TemporalAggregates;
use critter_map_complaint_models::{AnimalType, Season};
use critter_map_spatial::ClusterSummary;

use crate::{Fact, Finding, Report, ReportError, Section, TrendDirection};

/// Keeps the first strictly-greater entry, so ties resolve to the
/// smallest key in iteration order. Callers iterate `BTreeMap`s, which
/// makes the tie-break numeric order for periods, calendar order for
/// seasons, and taxonomy order for animal types.
fn arg_max_by_count<K: Copy, I: IntoIterator<Item = (K, u64)>>(entries: I) -> Option<(K, u64)> {
    let mut best: Option<(K, u64)> = None;
    for (key, count) in entries {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }
    best
}

/// Keeps the first strictly-smaller entry; same tie-break as
/// [`arg_max_by_count`].
fn arg_min_by_count<K: Copy, I: IntoIterator<Item = (K, u64)>>(entries: I) -> Option<(K, u64)> {
    let mut best: Option<(K, u64)> = None;
    for (key, count) in entries {
        if best.is_none_or(|(_, best_count)| count < best_count) {
            best = Some((key, count));
        }
    }
    best
}

/// Share of `count` in `total` as a percentage rounded to one decimal.
fn percent_of(count: u64, total: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Ranks animal types most-common-first, taxonomy order breaking ties.
fn ranked_animal_types(aggregates: &TemporalAggregates) -> Vec<(AnimalType, u64)> {
    let mut entries: Vec<(AnimalType, u64)> = aggregates
        .by_animal_type
        .iter()
        .map(|(animal, count)| (*animal, *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries
}

/// Synthesizes the findings document from the aggregate outputs.
///
/// Pure and deterministic: the generation date is an input, every
/// superlative uses the documented first-in-ascending-key tie-break, and
/// no randomness or wall-clock access is involved.
///
/// # Errors
///
/// Returns [`ReportError::EmptyAggregation`] if any superlative would be
/// taken over an empty table (no years, no animal types, no clusters, or
/// no seasons).
pub fn synthesize(
    aggregates: &TemporalAggregates,
    clusters: &ClusterSummary,
    top_n: usize,
    generated_on: NaiveDate,
) -> Result<Report, ReportError> {
    let total = aggregates.total();

    // -- Time trends --------------------------------------------------
    let (peak_year, peak_count) =
        arg_max_by_count(aggregates.by_year.iter().map(|(y, c)| (*y, *c))).ok_or(
            ReportError::EmptyAggregation {
                statistic: "peak year",
            },
        )?;
    let (quiet_year, quiet_count) =
        arg_min_by_count(aggregates.by_year.iter().map(|(y, c)| (*y, *c))).ok_or(
            ReportError::EmptyAggregation {
                statistic: "quietest year",
            },
        )?;

    let time_trends = Section {
        title: "Time Trends Analysis".to_string(),
        intro: None,
        ordered: false,
        findings: vec![
            Finding {
                fact: Fact::TotalComplaints { total },
                sentence: format!("Total complaints analyzed: {total}"),
            },
            Finding {
                fact: Fact::PeakYear {
                    year: peak_year,
                    count: peak_count,
                },
                sentence: format!(
                    "Year with most complaints: {peak_year} ({peak_count} complaints)"
                ),
            },
            Finding {
                fact: Fact::QuietestYear {
                    year: quiet_year,
                    count: quiet_count,
                },
                sentence: format!(
                    "Year with fewest complaints: {quiet_year} ({quiet_count} complaints)"
                ),
            },
        ],
    };

    // -- Animal types -------------------------------------------------
    let ranked = ranked_animal_types(aggregates);
    let (top_animal, _) = ranked
        .first()
        .copied()
        .ok_or(ReportError::EmptyAggregation {
            statistic: "top animal type",
        })?;

    let top_findings: Vec<Finding> = ranked
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (animal, count))| {
            let percent = percent_of(*count, total);
            Finding {
                fact: Fact::TopAnimalType {
                    rank: i + 1,
                    animal_type: *animal,
                    count: *count,
                    percent,
                },
                sentence: format!(
                    "{}: {count} complaints ({percent:.1}%)",
                    animal.label()
                ),
            }
        })
        .collect();

    let animal_types = Section {
        title: "Animal Type Analysis".to_string(),
        intro: Some(format!(
            "Top {} most reported animal types:",
            top_findings.len()
        )),
        ordered: true,
        findings: top_findings,
    };

    // -- Geographic patterns ------------------------------------------
    if clusters.centroids.is_empty() {
        return Err(ReportError::EmptyAggregation {
            statistic: "geographic clusters",
        });
    }

    let mut geo_findings = vec![Finding {
        fact: Fact::ClusterCount {
            clusters: clusters.centroids.len(),
        },
        sentence: format!(
            "Number of geographic clusters identified: {}",
            clusters.centroids.len()
        ),
    }];
    for (cluster, row) in &clusters.animal_counts {
        let (animal, count) = arg_max_by_count(row.iter().map(|(a, c)| (*a, *c))).ok_or(
            ReportError::EmptyAggregation {
                statistic: "dominant animal type per cluster",
            },
        )?;
        let centroid = clusters.centroids.get(*cluster).copied().ok_or(
            ReportError::EmptyAggregation {
                statistic: "cluster centroid",
            },
        )?;
        geo_findings.push(Finding {
            fact: Fact::ClusterDominantType {
                cluster: *cluster,
                animal_type: animal,
                count,
                latitude: centroid.latitude,
                longitude: centroid.longitude,
            },
            sentence: format!(
                "Cluster {cluster} (centered near {:.4}, {:.4}): {} ({count} complaints)",
                centroid.latitude,
                centroid.longitude,
                animal.label()
            ),
        });
    }

    let geographic = Section {
        title: "Geographic Pattern Analysis".to_string(),
        intro: None,
        ordered: false,
        findings: geo_findings,
    };

    // -- Seasonal patterns --------------------------------------------
    let season_totals = aggregates
        .by_season_and_type
        .iter()
        .map(|(season, row)| (*season, row.values().sum::<u64>()));
    let (peak_season, peak_season_count) =
        arg_max_by_count(season_totals).ok_or(ReportError::EmptyAggregation {
            statistic: "peak season",
        })?;

    let mut season_findings = vec![Finding {
        fact: Fact::PeakSeason {
            season: peak_season,
            count: peak_season_count,
        },
        sentence: format!(
            "Season with most complaints: {} ({peak_season_count} complaints)",
            peak_season.label()
        ),
    }];
    let mut peak_season_dominant = None;
    for (season, row) in &aggregates.by_season_and_type {
        let (animal, count) = arg_max_by_count(row.iter().map(|(a, c)| (*a, *c))).ok_or(
            ReportError::EmptyAggregation {
                statistic: "dominant animal type per season",
            },
        )?;
        if *season == peak_season {
            peak_season_dominant = Some(animal);
        }
        season_findings.push(Finding {
            fact: Fact::SeasonDominantType {
                season: *season,
                animal_type: animal,
                count,
            },
            sentence: format!("{}: {} ({count} complaints)", season.label(), animal.label()),
        });
    }
    let peak_season_dominant =
        peak_season_dominant.ok_or(ReportError::EmptyAggregation {
            statistic: "dominant animal type in the peak season",
        })?;

    let seasonal = Section {
        title: "Seasonal Pattern Analysis".to_string(),
        intro: None,
        ordered: false,
        findings: season_findings,
    };

    // -- Key findings -------------------------------------------------
    // First-vs-last-year comparison; BTreeMap keys are ascending, so
    // first/last iteration entries are the earliest/latest years.
    let (first_year, first_count) = aggregates
        .by_year
        .iter()
        .next()
        .map(|(y, c)| (*y, *c))
        .ok_or(ReportError::EmptyAggregation {
            statistic: "trend comparison",
        })?;
    let (last_year, last_count) = aggregates
        .by_year
        .iter()
        .next_back()
        .map(|(y, c)| (*y, *c))
        .ok_or(ReportError::EmptyAggregation {
            statistic: "trend comparison",
        })?;

    // Strict-greater test: an exact tie reads as "decreasing".
    let direction = if last_count > first_count {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let trend_sentence = match direction {
        TrendDirection::Increasing => {
            "**Temporal Trends**: Animal complaints have increased over the years, \
             suggesting a growing concern."
        }
        TrendDirection::Decreasing => {
            "**Temporal Trends**: Animal complaints have decreased over the years, \
             suggesting effective city interventions."
        }
    };

    let key_findings = Section {
        title: "Key Findings and Recommendations".to_string(),
        intro: None,
        ordered: true,
        findings: vec![
            Finding {
                fact: Fact::Trend {
                    direction,
                    first_year,
                    first_count,
                    last_year,
                    last_count,
                },
                sentence: trend_sentence.to_string(),
            },
            Finding {
                fact: Fact::FocusRecommendation {
                    animal_type: top_animal,
                },
                sentence: format!(
                    "**Animal Type Focus**: Focus resources on addressing {} issues as \
                     they represent the majority of complaints.",
                    top_animal.label()
                ),
            },
            Finding {
                fact: Fact::GeographicRecommendation,
                sentence: "**Geographic Prioritization**: Target interventions in clusters \
                           with high complaint volumes, particularly for the animal types \
                           prevalent in those areas."
                    .to_string(),
            },
            Finding {
                fact: Fact::SeasonalRecommendation {
                    season: peak_season,
                    animal_type: peak_season_dominant,
                },
                sentence: format!(
                    "**Seasonal Planning**: Allocate additional resources during {} when \
                     complaint volumes peak, especially for {} control.",
                    peak_season.label(),
                    peak_season_dominant.label()
                ),
            },
        ],
    };

    Ok(Report {
        title: "Animal Complaints Analysis Report".to_string(),
        generated_on,
        sections: vec![time_trends, animal_types, geographic, seasonal, key_findings],
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use critter_map_analytics_models::SeasonTypeTable;
    use critter_map_spatial::Centroid;
    use pretty_assertions::assert_eq;

    use super::*;

    fn season_table(entries: &[(Season, AnimalType, u64)]) -> SeasonTypeTable {
        let mut table: SeasonTypeTable = Season::all()
            .iter()
            .map(|season| {
                let row: BTreeMap<AnimalType, u64> =
                    AnimalType::all().iter().map(|t| (*t, 0)).collect();
                (*season, row)
            })
            .collect();
        for (season, animal, count) in entries {
            *table
                .get_mut(season)
                .unwrap()
                .get_mut(animal)
                .unwrap() = *count;
        }
        table
    }

    fn aggregates(
        years: &[(i32, u64)],
        animals: &[(AnimalType, u64)],
        seasons: &[(Season, AnimalType, u64)],
    ) -> TemporalAggregates {
        TemporalAggregates {
            by_year: years.iter().copied().collect(),
            by_animal_type: animals.iter().copied().collect(),
            by_season_and_type: season_table(seasons),
            ..TemporalAggregates::default()
        }
    }

    fn one_cluster(animals: &[(AnimalType, u64)]) -> ClusterSummary {
        let mut row: BTreeMap<AnimalType, u64> =
            AnimalType::all().iter().map(|t| (*t, 0)).collect();
        for (animal, count) in animals {
            row.insert(*animal, *count);
        }
        ClusterSummary {
            centroids: vec![Centroid {
                latitude: 42.36,
                longitude: -71.06,
            }],
            animal_counts: [(0, row)].into_iter().collect(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
    }

    #[test]
    fn percentages_are_exact_and_bounded() {
        let agg = aggregates(
            &[(2018, 2), (2019, 1)],
            &[(AnimalType::Dog, 2), (AnimalType::OtherAnimal, 1)],
            &[(Season::Winter, AnimalType::Dog, 3)],
        );
        let report = synthesize(&agg, &one_cluster(&[(AnimalType::Dog, 3)]), 5, date()).unwrap();

        let mut sum = 0.0;
        for section in &report.sections {
            for finding in &section.findings {
                if let Fact::TopAnimalType { count, percent, .. } = finding.fact {
                    #[allow(clippy::cast_precision_loss)]
                    let expected = (count as f64 / 3.0 * 100.0 * 10.0).round() / 10.0;
                    assert!((percent - expected).abs() < f64::EPSILON);
                    sum += percent;
                }
            }
        }
        assert!(sum <= 100.0 + f64::EPSILON);
    }

    #[test]
    fn tie_breaks_resolve_to_smallest_key() {
        let agg = aggregates(
            // Years tie: the earlier year must win both superlatives.
            &[(2018, 5), (2019, 5)],
            // Types tie: Dog precedes Cat in taxonomy order.
            &[(AnimalType::Cat, 4), (AnimalType::Dog, 4)],
            &[
                (Season::Winter, AnimalType::Dog, 4),
                (Season::Spring, AnimalType::Cat, 4),
            ],
        );
        let report = synthesize(&agg, &one_cluster(&[(AnimalType::Dog, 8)]), 5, date()).unwrap();

        let time = &report.sections[0];
        assert!(matches!(
            time.findings[1].fact,
            Fact::PeakYear { year: 2018, .. }
        ));
        assert!(matches!(
            time.findings[2].fact,
            Fact::QuietestYear { year: 2018, .. }
        ));

        let animals = &report.sections[1];
        assert!(matches!(
            animals.findings[0].fact,
            Fact::TopAnimalType {
                rank: 1,
                animal_type: AnimalType::Dog,
                ..
            }
        ));

        // Season totals tie at 4: Winter precedes Spring in calendar order.
        let seasonal = &report.sections[3];
        assert!(matches!(
            seasonal.findings[0].fact,
            Fact::PeakSeason {
                season: Season::Winter,
                ..
            }
        ));
    }

    #[test]
    fn trend_uses_strict_greater_comparison() {
        let cluster = one_cluster(&[(AnimalType::Dog, 1)]);
        let seasons = [(Season::Winter, AnimalType::Dog, 1)];

        let increasing = synthesize(
            &aggregates(&[(2018, 1), (2019, 2)], &[(AnimalType::Dog, 3)], &seasons),
            &cluster,
            5,
            date(),
        )
        .unwrap();
        let decreasing = synthesize(
            &aggregates(&[(2018, 2), (2019, 1)], &[(AnimalType::Dog, 3)], &seasons),
            &cluster,
            5,
            date(),
        )
        .unwrap();
        // Equal totals fall into the decreasing branch.
        let tied = synthesize(
            &aggregates(&[(2018, 2), (2019, 2)], &[(AnimalType::Dog, 4)], &seasons),
            &cluster,
            5,
            date(),
        )
        .unwrap();

        let direction = |report: &Report| {
            report.sections[4]
                .findings
                .iter()
                .find_map(|f| match f.fact {
                    Fact::Trend { direction, .. } => Some(direction),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(direction(&increasing), TrendDirection::Increasing);
        assert_eq!(direction(&decreasing), TrendDirection::Decreasing);
        assert_eq!(direction(&tied), TrendDirection::Decreasing);
    }

    #[test]
    fn empty_aggregation_fails_loudly() {
        let empty = TemporalAggregates::default();
        let err = synthesize(&empty, &one_cluster(&[]), 5, date()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::EmptyAggregation {
                statistic: "peak year"
            }
        ));
    }

    #[test]
    fn markdown_layout_matches_report_format() {
        let agg = aggregates(
            &[(2018, 2), (2019, 1)],
            &[(AnimalType::OtherAnimal, 3)],
            &[(Season::Winter, AnimalType::OtherAnimal, 2), (Season::Spring, AnimalType::OtherAnimal, 1)],
        );
        let report = synthesize(
            &agg,
            &one_cluster(&[(AnimalType::OtherAnimal, 3)]),
            5,
            date(),
        )
        .unwrap();
        let markdown = report.to_markdown();

        assert!(markdown.starts_with("# Animal Complaints Analysis Report\n"));
        assert!(markdown.contains("\n## Time Trends Analysis\n"));
        assert!(markdown.contains("- Total complaints analyzed: 3\n"));
        assert!(markdown.contains("Top 1 most reported animal types:"));
        assert!(markdown.contains("1. Other Animal: 3 complaints (100.0%)\n"));
        assert!(markdown.contains("- Year with most complaints: 2018 (2 complaints)\n"));
        assert!(markdown.contains("\n*Report generated on 2020-03-01*\n"));
    }

    #[test]
    fn superlative_helpers_keep_first_maximum() {
        assert_eq!(arg_max_by_count([(1, 5), (2, 5), (3, 4)]), Some((1, 5)));
        assert_eq!(arg_min_by_count([(1, 5), (2, 4), (3, 4)]), Some((2, 4)));
        assert_eq!(arg_max_by_count(Vec::<(i32, u64)>::new()), None);
    }
}
