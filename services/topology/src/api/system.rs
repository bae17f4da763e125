//! System/health API handlers.
//!
//! # Purpose
//! Lightweight endpoints for service metadata and readiness probes. Health
//! checks must stay fast and side-effect free.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service version and catalog backend", body = SystemInfo)
    )
)]
/// Return the API version and which catalog backend is in use.
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    let catalog = state.service.catalog();
    Json(SystemInfo {
        api_version: state.api_version.clone(),
        catalog_backend: catalog.backend_name().to_string(),
        catalog_durable: catalog.is_durable(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Topology service health", body = HealthStatus),
        (status = 500, description = "Catalog unavailable", body = crate::api::types::ErrorResponse)
    )
)]
/// Probe the catalog and return `ok` if it answers.
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.service.catalog().health_check().await {
        return Err(api_internal("catalog unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
