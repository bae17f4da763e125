//! Broker abstraction.
//!
//! # Purpose
//! The broker owns exchanges, queues and bindings. The topology service only
//! issues commands to it: declare the exchange point and the subscription queue,
//! then bind or unbind a binding key between them.
//!
//! # Contract
//! - Calls are blocking from the caller's point of view and cannot be
//!   cancelled once issued.
//! - `bind` of an existing binding and `unbind` of an absent one succeed.
use async_trait::async_trait;
use switchyard_exchange::{ExchangeError, ExchangeRegistry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker rejected {op} {binding_key} on {exchange} -> {queue}: {reason}")]
    Rejected {
        op: &'static str,
        exchange: String,
        queue: String,
        binding_key: String,
        reason: String,
    },
    #[error("broker declare failed: {0}")]
    Declare(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type BrokerResult<T> = Result<T, BrokerError>;

#[async_trait]
pub trait Broker: Send + Sync {
    async fn declare_exchange(&self, exchange_point: &str) -> BrokerResult<()>;
    async fn declare_queue(&self, exchange_name: &str) -> BrokerResult<()>;
    async fn bind(&self, queue: &str, binding_key: &str, exchange: &str) -> BrokerResult<()>;
    async fn unbind(&self, queue: &str, binding_key: &str, exchange: &str) -> BrokerResult<()>;
}

fn rejected(
    op: &'static str,
    queue: &str,
    binding_key: &str,
    exchange: &str,
    err: ExchangeError,
) -> BrokerError {
    BrokerError::Rejected {
        op,
        exchange: exchange.to_string(),
        queue: queue.to_string(),
        binding_key: binding_key.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl Broker for ExchangeRegistry {
    async fn declare_exchange(&self, exchange_point: &str) -> BrokerResult<()> {
        ExchangeRegistry::declare_exchange(self, exchange_point)
            .map(|_| ())
            .map_err(|err| BrokerError::Declare(err.to_string()))
    }

    async fn declare_queue(&self, exchange_name: &str) -> BrokerResult<()> {
        ExchangeRegistry::declare_queue(self, exchange_name)
            .map(|_| ())
            .map_err(|err| BrokerError::Declare(err.to_string()))
    }

    async fn bind(&self, queue: &str, binding_key: &str, exchange: &str) -> BrokerResult<()> {
        ExchangeRegistry::bind(self, queue, binding_key, exchange)
            .map(|_| ())
            .map_err(|err| rejected("bind", queue, binding_key, exchange, err))
    }

    async fn unbind(&self, queue: &str, binding_key: &str, exchange: &str) -> BrokerResult<()> {
        ExchangeRegistry::unbind(self, queue, binding_key, exchange)
            .map(|_| ())
            .map_err(|err| rejected("unbind", queue, binding_key, exchange, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exchange_registry_satisfies_idempotent_contract() {
        let registry = ExchangeRegistry::new();
        let broker: &dyn Broker = &registry;
        broker.declare_exchange("xp").await.expect("exchange");
        broker.declare_queue("q").await.expect("queue");
        broker.declare_queue("q").await.expect("queue again");

        broker.bind("q", "#.ctd.#", "xp").await.expect("bind");
        broker.bind("q", "#.ctd.#", "xp").await.expect("rebind");
        assert!(registry.is_bound("q", "#.ctd.#", "xp"));

        broker.unbind("q", "#.ctd.#", "xp").await.expect("unbind");
        broker.unbind("q", "#.ctd.#", "xp").await.expect("unbind absent");
        assert!(!registry.is_bound("q", "#.ctd.#", "xp"));
    }

    #[tokio::test]
    async fn undeclared_exchange_is_rejected() {
        let registry = ExchangeRegistry::new();
        let broker: &dyn Broker = &registry;
        broker.declare_queue("q").await.expect("queue");
        let err = broker.bind("q", "*", "nowhere").await.expect_err("rejected");
        assert!(matches!(err, BrokerError::Rejected { op: "bind", .. }));

        let err = broker.declare_exchange("").await.expect_err("empty");
        assert!(matches!(err, BrokerError::Declare(_)));
    }
}
