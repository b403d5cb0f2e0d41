#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the critter map analysis pipeline.
//!
//! Running without a subcommand executes the full pipeline with its
//! defaults (the five annual export files under `data/`, outputs under
//! `outputs/`, 5 clusters, Top-5 ranking). `serve` boots the dashboard
//! API over a previously exported cleaned table.

mod pipeline;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use clap::{Parser, Subcommand};

use crate::pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "critter_map_cli", about = "Animal complaint analysis pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline
    Run {
        /// Directory containing the annual export files (2015.csv ... 2019.csv)
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Directory for the cleaned table, chart specs, and report
        #[arg(long, default_value = "outputs")]
        out_dir: PathBuf,
        /// Number of geographic clusters
        #[arg(long, default_value = "5")]
        clusters: usize,
        /// Number of entries in the animal-type ranking
        #[arg(long, default_value = "5")]
        top: usize,
    },
    /// Serve the interactive dashboard over a cleaned table
    Serve {
        /// Cleaned table exported by a previous pipeline run
        #[arg(long, default_value = "outputs/cleaned_animal_complaints.csv")]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    // No subcommand means a default full pipeline run.
    let command = cli.command.unwrap_or(Commands::Run {
        data_dir: PathBuf::from("data"),
        out_dir: PathBuf::from("outputs"),
        clusters: critter_map_spatial::DEFAULT_CLUSTERS,
        top: critter_map_report::DEFAULT_TOP_N,
    });

    match command {
        Commands::Run {
            data_dir,
            out_dir,
            clusters,
            top,
        } => {
            let config = PipelineConfig {
                data_dir,
                out_dir,
                clusters,
                top_n: top,
            };
            let cancel = AtomicBool::new(false);
            let outcome = pipeline::run(&config, &cancel)?;
            println!(
                "Analysis complete: {} records analyzed, report at {}",
                outcome.record_count,
                outcome.report_path.display()
            );
        }
        Commands::Serve { input } => {
            let records = critter_map_ingest::import_cleaned(&input)?;
            let state = critter_map_dashboard::DashboardState::new(records);
            actix_web::rt::System::new().block_on(critter_map_dashboard::run_server(state))?;
        }
    }

    Ok(())
}
