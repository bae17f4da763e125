//! Stream definition API handlers.
use crate::api::error::ApiError;
use crate::api::parse_id;
use crate::api::types::{
    CompareResponse, CreatedResponse, IdListResponse, StreamDefinitionCreateRequest,
};
use crate::app::AppState;
use crate::model::StreamDefinition;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    post,
    path = "/v1/stream-definitions",
    tag = "stream-definitions",
    request_body = StreamDefinitionCreateRequest,
    responses(
        (status = 201, description = "Stream definition created or an equivalent one returned", body = CreatedResponse),
        (status = 409, description = "Name taken by a different schema", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_stream_definition(
    State(state): State<AppState>,
    Json(body): Json<StreamDefinitionCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.service.create_stream_definition(body.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/v1/stream-definitions/{id}",
    tag = "stream-definitions",
    params(("id" = String, Path, description = "Stream definition id")),
    responses(
        (status = 200, description = "Fetch stream definition", body = StreamDefinition),
        (status = 404, description = "Stream definition not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_stream_definition(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StreamDefinition>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read_stream_definition(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/stream-definitions/{id}",
    tag = "stream-definitions",
    params(("id" = String, Path, description = "Stream definition id")),
    responses(
        (status = 204, description = "Stream definition deleted"),
        (status = 404, description = "Stream definition not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_stream_definition(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_stream_definition(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/stream-definitions/{id}/compare/{other_id}",
    tag = "stream-definitions",
    params(
        ("id" = String, Path, description = "Stream definition id"),
        ("other_id" = String, Path, description = "Stream definition to compare against")
    ),
    responses(
        (status = 200, description = "Schema equivalence", body = CompareResponse),
        (status = 404, description = "Stream definition not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn compare_stream_definitions(
    Path((id, other_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<CompareResponse>, ApiError> {
    let id = parse_id(&id)?;
    let other_id = parse_id(&other_id)?;
    let equivalent = state
        .service
        .compare_stream_definitions(&id, &other_id)
        .await?;
    Ok(Json(CompareResponse { equivalent }))
}

#[utoipa::path(
    get,
    path = "/v1/stream-definitions/{id}/streams",
    tag = "stream-definitions",
    params(("id" = String, Path, description = "Stream definition id")),
    responses(
        (status = 200, description = "Streams using this definition", body = IdListResponse),
        (status = 404, description = "Stream definition not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_definition_streams(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdListResponse>, ApiError> {
    let id = parse_id(&id)?;
    let items = state.service.find_streams_by_definition(&id).await?;
    Ok(Json(IdListResponse { items }))
}
