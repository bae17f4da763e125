//! Topology HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::observability;
use crate::service::TopologyService;
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub service: TopologyService,
    pub api_version: String,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/v1/system/info", get(api::system::system_info))
        .route("/v1/system/health", get(api::system::system_health))
        .route(
            "/v1/stream-definitions",
            post(api::stream_definitions::create_stream_definition),
        )
        .route(
            "/v1/stream-definitions/:id",
            get(api::stream_definitions::get_stream_definition)
                .delete(api::stream_definitions::delete_stream_definition),
        )
        .route(
            "/v1/stream-definitions/:id/compare/:other_id",
            get(api::stream_definitions::compare_stream_definitions),
        )
        .route(
            "/v1/stream-definitions/:id/streams",
            get(api::stream_definitions::list_definition_streams),
        )
        .route("/v1/streams", post(api::streams::create_stream))
        .route(
            "/v1/streams/:id",
            get(api::streams::get_stream).delete(api::streams::delete_stream),
        )
        .route("/v1/streams/:id/route", get(api::streams::get_stream_route))
        .route(
            "/v1/streams/:id/persisted",
            get(api::streams::get_persisted)
                .put(api::streams::persist_stream)
                .delete(api::streams::unpersist_stream),
        )
        .route(
            "/v1/topics",
            get(api::topics::find_topics).post(api::topics::create_topic),
        )
        .route(
            "/v1/topics/:id",
            get(api::topics::get_topic).delete(api::topics::delete_topic),
        )
        .route("/v1/topics/:id/topics", get(api::topics::list_child_topics))
        .route("/v1/topics/:id/streams", get(api::topics::list_topic_streams))
        .route(
            "/v1/subscriptions",
            post(api::subscriptions::create_subscription),
        )
        .route(
            "/v1/subscriptions/:id",
            get(api::subscriptions::get_subscription)
                .delete(api::subscriptions::delete_subscription),
        )
        .route(
            "/v1/subscriptions/:id/active",
            put(api::subscriptions::activate_subscription)
                .get(api::subscriptions::get_active)
                .delete(api::subscriptions::deactivate_subscription),
        )
        .route(
            "/v1/resources/snapshot",
            get(api::resources::resource_snapshot),
        )
        .route(
            "/v1/resources/changes",
            get(api::resources::resource_changes),
        )
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()))
        .layer(trace_layer)
        .with_state(state)
}
