//! Topic API handlers.
use crate::api::error::ApiError;
use crate::api::parse_id;
use crate::api::types::{CreatedResponse, IdListResponse, TopicCreateRequest};
use crate::app::AppState;
use crate::model::Topic;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/v1/topics",
    tag = "topics",
    request_body = TopicCreateRequest,
    responses(
        (status = 201, description = "Topic created", body = CreatedResponse),
        (status = 400, description = "Missing exchange point or parent on another exchange point", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Parent topic not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_topic(
    State(state): State<AppState>,
    Json(body): Json<TopicCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.service.create_topic(body.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/v1/topics",
    tag = "topics",
    params(("name" = String, Query, description = "Topic name to look up")),
    responses(
        (status = 200, description = "Topics with this name", body = IdListResponse),
        (status = 400, description = "Missing name", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn find_topics(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<IdListResponse>, ApiError> {
    let Some(name) = params.get("name") else {
        return Err(crate::api::error::api_validation_error(
            "query parameter `name` is required",
        ));
    };
    let items = state.service.find_topics_by_name(name).await?;
    Ok(Json(IdListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/topics/{id}",
    tag = "topics",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = 200, description = "Fetch topic", body = Topic),
        (status = 404, description = "Topic not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_topic(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Topic>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read_topic(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/topics/{id}",
    tag = "topics",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 400, description = "Topic has children or is bound by an active subscription", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Topic not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_topic(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_topic(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/topics/{id}/topics",
    tag = "topics",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = 200, description = "Direct child topics", body = IdListResponse),
        (status = 404, description = "Topic not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_child_topics(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdListResponse>, ApiError> {
    let id = parse_id(&id)?;
    let items = state.service.find_topics_by_topic(&id).await?;
    Ok(Json(IdListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/topics/{id}/streams",
    tag = "topics",
    params(("id" = String, Path, description = "Topic id")),
    responses(
        (status = 200, description = "Streams tagged with the topic", body = IdListResponse),
        (status = 404, description = "Topic not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_topic_streams(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdListResponse>, ApiError> {
    let id = parse_id(&id)?;
    let items = state.service.find_streams_by_topic(&id).await?;
    Ok(Json(IdListResponse { items }))
}
