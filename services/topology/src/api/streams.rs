//! Stream API handlers.
//!
//! # Purpose
//! Stream create/read/delete, route lookup and the `persisted` flag.
use crate::api::error::ApiError;
use crate::api::parse_id;
use crate::api::types::{PersistedResponse, StreamCreateRequest, StreamCreatedResponse};
use crate::app::AppState;
use crate::model::{Stream, StreamRoute};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    post,
    path = "/v1/streams",
    tag = "streams",
    request_body = StreamCreateRequest,
    responses(
        (status = 201, description = "Stream created", body = StreamCreatedResponse),
        (status = 400, description = "Missing exchange point or routing key too long", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Stream already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_stream(
    State(state): State<AppState>,
    Json(body): Json<StreamCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (id, route) = state.service.create_stream(body.into()).await?;
    Ok((StatusCode::CREATED, Json(StreamCreatedResponse { id, route })))
}

#[utoipa::path(
    get,
    path = "/v1/streams/{id}",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Fetch stream", body = Stream),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_stream(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Stream>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read_stream(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/streams/{id}",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 204, description = "Stream deleted"),
        (status = 400, description = "Stream is used by a subscription", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_stream(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_stream(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/streams/{id}/route",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Stream route", body = StreamRoute),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_stream_route(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StreamRoute>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read_stream_route(&id).await?))
}

#[utoipa::path(
    get,
    path = "/v1/streams/{id}/persisted",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Persistence flag", body = PersistedResponse),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_persisted(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PersistedResponse>, ApiError> {
    let id = parse_id(&id)?;
    let persisted = state.service.is_persisted(&id).await?;
    Ok(Json(PersistedResponse { persisted }))
}

#[utoipa::path(
    put,
    path = "/v1/streams/{id}/persisted",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Stream persisted", body = PersistedResponse),
        (status = 400, description = "Stream already persisted", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn persist_stream(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PersistedResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.service.persist_stream(&id).await?;
    Ok(Json(PersistedResponse { persisted: true }))
}

#[utoipa::path(
    delete,
    path = "/v1/streams/{id}/persisted",
    tag = "streams",
    params(("id" = String, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Stream no longer persisted", body = PersistedResponse),
        (status = 400, description = "Stream was not persisted", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Stream not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn unpersist_stream(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PersistedResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.service.unpersist_stream(&id).await?;
    Ok(Json(PersistedResponse { persisted: false }))
}
