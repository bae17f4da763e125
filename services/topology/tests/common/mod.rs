use std::sync::Arc;
use switchyard_exchange::ExchangeRegistry;
use topology::app::{AppState, build_router};
use topology::config::{DEFAULT_CHANGE_RETENTION_MAX_ROWS, DEFAULT_CHANGES_LIMIT};
use topology::service::TopologyService;
use topology::store::StoreConfig;
use topology::store::memory::InMemoryCatalog;

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

/// Router over a fresh in-memory catalog, plus the registry it binds into.
#[allow(dead_code)]
pub fn app_with_registry() -> (TestApp, Arc<ExchangeRegistry>) {
    let catalog = Arc::new(InMemoryCatalog::new(StoreConfig {
        changes_limit: DEFAULT_CHANGES_LIMIT,
        change_retention_max_rows: Some(DEFAULT_CHANGE_RETENTION_MAX_ROWS),
    }));
    let registry = Arc::new(ExchangeRegistry::new());
    let state = AppState {
        service: TopologyService::new(catalog, registry.clone()),
        api_version: "v1".to_string(),
    };
    (build_router(state).into_service(), registry)
}

#[allow(dead_code)]
pub fn app() -> TestApp {
    app_with_registry().0
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
