//! Subscription API handlers.
//!
//! # Purpose
//! Subscription create/read/delete and the activation state machine. `PUT`
//! on `/active` activates, `DELETE` deactivates.
use crate::api::error::ApiError;
use crate::api::parse_id;
use crate::api::types::{ActiveResponse, CreatedResponse, SubscriptionCreateRequest};
use crate::app::AppState;
use crate::model::{Subscription, SubscriptionState};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

fn active(active: bool) -> ActiveResponse {
    ActiveResponse {
        active,
        state: if active {
            SubscriptionState::Active
        } else {
            SubscriptionState::Inactive
        },
    }
}

#[utoipa::path(
    post,
    path = "/v1/subscriptions",
    tag = "subscriptions",
    request_body = SubscriptionCreateRequest,
    responses(
        (status = 201, description = "Subscription created", body = CreatedResponse),
        (status = 400, description = "No name or exchange name, or an empty exchange point", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Referenced stream or topic not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Subscription already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_subscription(
    State(state): State<AppState>,
    Json(body): Json<SubscriptionCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.service.create_subscription(body.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/v1/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Fetch subscription", body = Subscription),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_subscription(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Subscription>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read_subscription(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 400, description = "Subscription is active", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_subscription(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_subscription(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/subscriptions/{id}/active",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Activation state", body = ActiveResponse),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_active(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ActiveResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(active(state.service.subscription_is_active(&id).await?)))
}

#[utoipa::path(
    put,
    path = "/v1/subscriptions/{id}/active",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription activated", body = ActiveResponse),
        (status = 400, description = "Subscription already active", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Broker failure; bindings may be partially applied", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn activate_subscription(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ActiveResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.service.activate_subscription(&id).await?;
    Ok(Json(active(true)))
}

#[utoipa::path(
    delete,
    path = "/v1/subscriptions/{id}/active",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription deactivated", body = ActiveResponse),
        (status = 400, description = "Subscription not active", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn deactivate_subscription(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ActiveResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.service.deactivate_subscription(&id).await?;
    Ok(Json(active(false)))
}
