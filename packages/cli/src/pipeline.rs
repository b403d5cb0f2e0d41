//! Full pipeline orchestrator.
//!
//! Chains load -> normalize -> export -> aggregate -> cluster -> charts
//! -> report as a single-threaded, synchronous batch: each stage fully
//! consumes its input before the next begins, and no state is shared
//! across stages. A best-effort cancellation flag is checked between
//! stages (never mid-stage).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use critter_map_charts::{ChartError, ChartRenderer as _, SpecFileRenderer, specs};
use critter_map_ingest::{
    IngestError, NormalizeSummary, export_cleaned, load_records, normalize,
};
use critter_map_report::{ReportError, synthesize};
use critter_map_spatial::{SpatialError, cluster_records, summarize};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

/// The five annual export files the pipeline analyzes.
pub const ANNUAL_FILES: &[&str] = &["2015.csv", "2016.csv", "2017.csv", "2018.csv", "2019.csv"];

/// Name of the exported cleaned table.
pub const CLEANED_TABLE: &str = "cleaned_animal_complaints.csv";

/// Name of the findings report document.
pub const REPORT_FILE: &str = "analysis_report.md";

/// Pipeline configuration. Everything beyond the directory roots is
/// limited to the cluster count and the ranking size.
pub struct PipelineConfig {
    /// Directory containing the annual export files.
    pub data_dir: PathBuf,
    /// Directory for all pipeline outputs.
    pub out_dir: PathBuf,
    /// Number of geographic clusters.
    pub clusters: usize,
    /// Number of entries in the animal-type ranking.
    pub top_n: usize,
}

/// What a completed pipeline run produced.
pub struct PipelineOutcome {
    /// Drop counts from normalization.
    pub summary: NormalizeSummary,
    /// Records that reached analysis.
    pub record_count: usize,
    /// Path of the exported cleaned table.
    pub cleaned_path: PathBuf,
    /// Path of the findings report.
    pub report_path: PathBuf,
}

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ingestion or normalization failed.
    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),

    /// Clustering failed.
    #[error("clustering failed: {0}")]
    Spatial(#[from] SpatialError),

    /// Emitting chart specs failed.
    #[error("chart generation failed: {0}")]
    Chart(#[from] ChartError),

    /// Report synthesis failed.
    #[error("report synthesis failed: {0}")]
    Report(#[from] ReportError),

    /// Writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was cancelled between stages.
    #[error("pipeline cancelled before the {stage} stage")]
    Cancelled {
        /// Stage that would have run next.
        stage: &'static str,
    },
}

fn check_cancelled(cancel: &AtomicBool, stage: &'static str) -> Result<(), PipelineError> {
    if cancel.load(Ordering::Relaxed) {
        return Err(PipelineError::Cancelled { stage });
    }
    Ok(())
}

fn steps_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar
}

/// Runs the full pipeline.
///
/// # Errors
///
/// Returns [`PipelineError`] if any stage fails or the run is cancelled
/// between stages. Stage-local data-quality issues (bad dates, missing
/// coordinates) are absorbed by the normalizer and reported through the
/// returned [`NormalizeSummary`] instead.
pub fn run(config: &PipelineConfig, cancel: &AtomicBool) -> Result<PipelineOutcome, PipelineError> {
    let pipeline_start = Instant::now();
    let bar = steps_bar(7);

    // --- 1. Load -------------------------------------------------------
    bar.set_message("Loading annual exports");
    let paths: Vec<PathBuf> = ANNUAL_FILES
        .iter()
        .map(|file| config.data_dir.join(file))
        .collect();
    let rows = load_records(&paths)?;
    log::info!("Loaded {} raw rows from {} files", rows.len(), paths.len());
    bar.inc(1);

    // --- 2. Normalize --------------------------------------------------
    check_cancelled(cancel, "normalize")?;
    bar.set_message("Normalizing records");
    let (records, summary) = normalize(rows);
    if records.is_empty() {
        return Err(IngestError::NoRecords {
            total_raw: summary.total_raw,
        }
        .into());
    }
    bar.inc(1);

    // --- 3. Export cleaned table --------------------------------------
    check_cancelled(cancel, "export")?;
    bar.set_message("Exporting cleaned table");
    std::fs::create_dir_all(&config.out_dir)?;
    let cleaned_path = config.out_dir.join(CLEANED_TABLE);
    export_cleaned(&records, &cleaned_path)?;
    bar.inc(1);

    // --- 4. Temporal aggregation --------------------------------------
    check_cancelled(cancel, "aggregate")?;
    bar.set_message("Aggregating time trends");
    let aggregates = critter_map_analytics::aggregate(&records);
    bar.inc(1);

    // --- 5. Geographic clustering -------------------------------------
    check_cancelled(cancel, "cluster")?;
    bar.set_message("Clustering coordinates");
    let assignment = cluster_records(&records, config.clusters)?;
    let cluster_summary = summarize(&records, &assignment);
    bar.inc(1);

    // --- 6. Chart specs ------------------------------------------------
    check_cancelled(cancel, "charts")?;
    bar.set_message("Writing chart specs");
    let renderer = SpecFileRenderer::new(&config.out_dir.join("charts"))?;
    for (name, spec) in specs::all_views(
        &records,
        &aggregates,
        &assignment,
        &cluster_summary.animal_counts,
    ) {
        renderer.render(name, &spec)?;
    }
    bar.inc(1);

    // --- 7. Report -----------------------------------------------------
    check_cancelled(cancel, "report")?;
    bar.set_message("Synthesizing report");
    let report = synthesize(
        &aggregates,
        &cluster_summary,
        config.top_n,
        chrono::Local::now().date_naive(),
    )?;
    let report_path = config.out_dir.join(REPORT_FILE);
    std::fs::write(&report_path, report.to_markdown())?;
    bar.inc(1);

    bar.finish_with_message("Pipeline complete");
    log::info!(
        "Pipeline complete: {} records analyzed in {:.1}s, report at {}",
        records.len(),
        pipeline_start.elapsed().as_secs_f64(),
        report_path.display()
    );

    Ok(PipelineOutcome {
        summary,
        record_count: records.len(),
        cleaned_path,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    const HEADER: &str = "type,case_title,subject,open_dt,closed_dt,latitude,longitude\n";

    fn write_annual_files(data_dir: &Path, rows_2018: &str, rows_2019: &str) {
        std::fs::create_dir_all(data_dir).unwrap();
        for file in ANNUAL_FILES {
            let body = match *file {
                "2018.csv" => format!("{HEADER}{rows_2018}"),
                "2019.csv" => format!("{HEADER}{rows_2019}"),
                _ => HEADER.to_string(),
            };
            std::fs::write(data_dir.join(file), body).unwrap();
        }
    }

    #[test]
    fn end_to_end_over_three_bite_records() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let out_dir = dir.path().join("outputs");
        write_annual_files(
            &data_dir,
            "Animal Bite,Animal Bite,Animal Control,2018-01-01 08:00:00,,42.360,-71.060\n\
             Animal Bite,Animal Bite,Animal Control,2018-06-15 10:30:00,,42.361,-71.061\n\
             Pothole,Pothole on Main St,Public Works,2018-02-01 09:00:00,,42.350,-71.050\n",
            "Animal Bite,Animal Bite,Animal Control,2019-01-01 12:00:00,,42.359,-71.059\n",
        );

        let config = PipelineConfig {
            data_dir,
            out_dir: out_dir.clone(),
            clusters: 1,
            top_n: 5,
        };
        let cancel = AtomicBool::new(false);
        let outcome = run(&config, &cancel).unwrap();

        assert_eq!(outcome.record_count, 3);
        assert_eq!(outcome.summary.non_animal, 1);
        assert!(outcome.cleaned_path.is_file());
        assert!(outcome.report_path.is_file());
        for view in [
            "yearly_complaints",
            "monthly_complaints",
            "day_of_week_complaints",
            "animal_type_complaints",
            "quarterly_complaints",
            "seasonal_pattern",
            "animal_types_by_season",
            "geographic_clusters",
            "animal_types_by_cluster",
        ] {
            assert!(out_dir.join("charts").join(format!("{view}.json")).is_file());
        }

        let report = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert!(report.contains("Year with most complaints: 2018 (2 complaints)"));
        assert!(report.contains("Year with fewest complaints: 2019 (1 complaints)"));
        assert!(report.contains("Other Animal: 3 complaints (100.0%)"));
        assert!(report.contains("Number of geographic clusters identified: 1"));
        // 2018 had 2 complaints, 2019 had 1: the strict-greater trend
        // comparison lands in the decreasing branch.
        assert!(report.contains("complaints have decreased over the years"));

        let cleaned = std::fs::read_to_string(&outcome.cleaned_path).unwrap();
        // Header plus one line per record.
        assert_eq!(cleaned.lines().count(), 4);
    }

    #[test]
    fn cancellation_stops_between_stages() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        write_annual_files(
            &data_dir,
            "Animal Bite,Animal Bite,Animal Control,2018-01-01 08:00:00,,42.360,-71.060\n",
            "",
        );

        let config = PipelineConfig {
            data_dir,
            out_dir: dir.path().join("outputs"),
            clusters: 1,
            top_n: 5,
        };
        let cancel = AtomicBool::new(true);
        let err = run(&config, &cancel).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Cancelled { stage: "normalize" }
        ));
    }

    #[test]
    fn too_many_clusters_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        write_annual_files(
            &data_dir,
            "Animal Bite,Animal Bite,Animal Control,2018-01-01 08:00:00,,42.360,-71.060\n",
            "",
        );

        let config = PipelineConfig {
            data_dir,
            out_dir: dir.path().join("outputs"),
            clusters: 5,
            top_n: 5,
        };
        let cancel = AtomicBool::new(false);
        let err = run(&config, &cancel).unwrap_err();
        assert!(matches!(err, PipelineError::Spatial(_)));
    }
}
