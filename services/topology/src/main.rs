//! Switchyard topology HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, the catalog, the broker and the HTTP router, then
//! serves the API until shutdown.
use std::future::Future;
use std::sync::Arc;
use switchyard_exchange::ExchangeRegistry;
use topology::app::{AppState, build_router};
use topology::config::TopologyConfig;
use topology::observability;
use topology::service::TopologyService;
use topology::store::Catalog;
use topology::store::memory::InMemoryCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TopologyConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: TopologyConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("switchyard-topology")?;
    let state = build_state(&config)?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "topology service listening");
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {
            tracing::info!("shutdown requested");
        }
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_state(config: &TopologyConfig) -> anyhow::Result<AppState> {
    let catalog: Arc<dyn Catalog> = Arc::new(InMemoryCatalog::new(config.store_config()));
    let broker = Arc::new(ExchangeRegistry::new());
    Ok(AppState {
        service: TopologyService::new(catalog, broker),
        api_version: "v1".to_string(),
    })
}
