//! Catalog change-feed handlers.
//!
//! # Purpose
//! Lets downstream caches bootstrap from a snapshot and then follow resource
//! changes by sequence number.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{ResourceChangesResponse, ResourceSnapshotResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Query, State};
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/resources/snapshot",
    tag = "resources",
    responses(
        (status = 200, description = "Full resource snapshot", body = ResourceSnapshotResponse)
    )
)]
pub(crate) async fn resource_snapshot(
    State(state): State<AppState>,
) -> Result<Json<ResourceSnapshotResponse>, ApiError> {
    let snapshot = state
        .service
        .catalog()
        .resource_snapshot()
        .await
        .map_err(|err| api_internal("failed to load resource snapshot", &err))?;
    Ok(Json(ResourceSnapshotResponse {
        items: snapshot.items,
        next_seq: snapshot.next_seq,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/resources/changes",
    tag = "resources",
    params(
        ("since" = Option<u64>, Query, description = "Last seen sequence")
    ),
    responses(
        (status = 200, description = "Resource change list", body = ResourceChangesResponse)
    )
)]
pub(crate) async fn resource_changes(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<ResourceChangesResponse>, ApiError> {
    let since = params
        .get("since")
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(0);
    let changes = state
        .service
        .catalog()
        .resource_changes(since)
        .await
        .map_err(|err| api_internal("failed to load resource changes", &err))?;
    Ok(Json(ResourceChangesResponse {
        items: changes.items,
        next_seq: changes.next_seq,
    }))
}
