//! HTTP handler functions for the dashboard API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::DashboardState;

/// Query parameters for the view endpoint.
#[derive(Debug, Deserialize)]
pub struct ViewParams {
    /// Comma-separated case-type labels; absent or empty means no filter.
    pub types: Option<String>,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/case-types`
///
/// Returns the sorted distinct case-type labels for the filter dropdown.
pub async fn case_types(state: web::Data<Arc<DashboardState>>) -> HttpResponse {
    HttpResponse::Ok().json(state.case_types())
}

/// `GET /api/view?types=a,b,c`
///
/// Derives the time-series and map view for the selected case types.
pub async fn view(
    state: web::Data<Arc<DashboardState>>,
    params: web::Query<ViewParams>,
) -> HttpResponse {
    let filter: Vec<String> = params
        .types
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    HttpResponse::Ok().json(crate::view(&state, &filter))
}
