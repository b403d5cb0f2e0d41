#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive dashboard API over the cleaned complaint table.
//!
//! The dashboard is a read-only consumer of the pipeline's cleaned
//! record table: it re-derives a daily time series and a geo scatter for
//! whatever case-type filter the user selects. State is loaded exactly
//! once at startup into [`DashboardState`]; the filter callback is the
//! pure function [`view`], so the same state and filter always produce
//! the same view. Nothing here feeds back into the report pipeline.

mod handlers;

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::NaiveDate;
use critter_map_complaint_models::ComplaintRecord;
use serde::{Deserialize, Serialize};

/// Process-wide dashboard state, built once at startup.
pub struct DashboardState {
    records: Vec<ComplaintRecord>,
}

impl DashboardState {
    /// Wraps the cleaned record set. No reloading happens after this.
    #[must_use]
    pub const fn new(records: Vec<ComplaintRecord>) -> Self {
        Self { records }
    }

    /// All records in the state.
    #[must_use]
    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    /// Sorted distinct case-type labels, for the filter dropdown.
    /// Empty labels are skipped.
    #[must_use]
    pub fn case_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .records
            .iter()
            .map(|r| r.case_type.clone())
            .filter(|t| !t.is_empty())
            .collect();
        types.sort();
        types.dedup();
        types
    }
}

/// One day of the dashboard time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Calendar date.
    pub date: NaiveDate,
    /// Complaints opened that day.
    pub count: u64,
}

/// One point of the dashboard map scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Complaint latitude.
    pub latitude: f64,
    /// Complaint longitude.
    pub longitude: f64,
    /// Case-type label (drives marker color).
    pub case_type: String,
    /// Case title for hover text.
    pub case_title: Option<String>,
}

/// The derived dashboard view for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Daily complaint counts, ascending by date.
    pub time_series: Vec<DailyCount>,
    /// Geo scatter points for the map.
    pub points: Vec<MapPoint>,
}

/// Derives the dashboard view for a case-type selection.
///
/// An empty filter selects everything; otherwise a record is included
/// when its `type` label matches any selected value exactly.
#[must_use]
pub fn view(state: &DashboardState, filter: &[String]) -> DashboardView {
    let selected: Vec<&ComplaintRecord> = state
        .records
        .iter()
        .filter(|record| filter.is_empty() || filter.contains(&record.case_type))
        .collect();

    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in &selected {
        *daily.entry(record.open_at.date()).or_insert(0) += 1;
    }

    DashboardView {
        time_series: daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
        points: selected
            .into_iter()
            .map(|record| MapPoint {
                latitude: record.latitude,
                longitude: record.longitude,
                case_type: record.case_type.clone(),
                case_title: record.case_title.clone(),
            })
            .collect(),
    }
}

/// Starts the dashboard API server over the given state.
///
/// This is a regular async function; the caller provides the async
/// runtime (e.g. via `actix_web::rt::System`). Binds `BIND_ADDR`/`PORT`
/// or their defaults.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(state: DashboardState) -> std::io::Result<()> {
    let state = web::Data::new(Arc::new(state));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!(
        "Starting dashboard on {bind_addr}:{port} with {} records",
        state.records().len()
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/case-types", web::get().to(handlers::case_types))
                    .route("/view", web::get().to(handlers::view)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
