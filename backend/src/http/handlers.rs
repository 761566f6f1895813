//! HTTP handlers for the REST API.
//!
//! Each handler delegates to the service layer; CPU-bound work runs on the
//! blocking pool.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use super::dto::{CoverageForm, CoverageReport, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services::compute_coverage;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse::default()))
}

/// POST /v1/coverage (also mounted at /api/optimize)
///
/// Multipart upload of the demand and rider tables plus range parameters.
/// Returns the coverage report.
pub async fn compute_coverage_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HandlerResult<CoverageReport> {
    let form = CoverageForm::read(multipart).await?;
    let request = form.into_request(state.coverage_settings())?;

    info!(
        "Coverage request: city='{}' demand={} ({}, {} bytes) riders={} ({}, {} bytes)",
        request.city,
        request.demand.name,
        request.demand.format,
        request.demand.bytes.len(),
        request.riders.name,
        request.riders.format,
        request.riders.bytes.len()
    );

    let report = tokio::task::spawn_blocking(move || compute_coverage(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(report))
}
