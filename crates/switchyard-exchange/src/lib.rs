// In-process exchange/queue binding registry.
// Exchanges and queues are declared by name; bindings attach a queue to an
// exchange under a binding key. Bind and unbind are idempotent so a control
// plane can replay them after a partial failure.
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};

pub mod pattern;

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("exchange name must not be empty")]
    EmptyExchangeName,
    #[error("queue name must not be empty")]
    EmptyQueueName,
    #[error("binding key must not be empty")]
    EmptyBindingKey,
    #[error("exchange not declared: {0}")]
    UnknownExchange(String),
    #[error("queue not declared: {0}")]
    UnknownQueue(String),
}

/// A single queue binding on an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    pub exchange: String,
    pub queue: String,
    pub binding_key: String,
}

#[derive(Debug, Default)]
struct BindingTable {
    // queue name -> binding keys
    by_queue: HashMap<String, BTreeSet<String>>,
}

#[derive(Debug, Default)]
struct Registry {
    exchanges: HashMap<String, BindingTable>,
    queues: HashSet<String>,
}

/// Exchange registry with topic-pattern routing.
///
/// ```
/// use switchyard_exchange::ExchangeRegistry;
///
/// let registry = ExchangeRegistry::new();
/// registry.declare_exchange("science_data").expect("exchange");
/// registry.declare_queue("ingest").expect("queue");
/// registry.bind("ingest", "#.ctd.#", "science_data").expect("bind");
/// assert_eq!(registry.route("science_data", "station.ctd.stream"), vec!["ingest"]);
/// ```
#[derive(Debug, Default)]
pub struct ExchangeRegistry {
    inner: RwLock<Registry>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an exchange. Returns false when it already existed.
    pub fn declare_exchange(&self, exchange: &str) -> Result<bool> {
        if exchange.is_empty() {
            return Err(ExchangeError::EmptyExchangeName);
        }
        let mut inner = self.inner.write();
        if inner.exchanges.contains_key(exchange) {
            return Ok(false);
        }
        inner
            .exchanges
            .insert(exchange.to_string(), BindingTable::default());
        tracing::debug!(exchange, "exchange declared");
        Ok(true)
    }

    /// Declare a queue. Returns false when it already existed.
    pub fn declare_queue(&self, queue: &str) -> Result<bool> {
        if queue.is_empty() {
            return Err(ExchangeError::EmptyQueueName);
        }
        let created = self.inner.write().queues.insert(queue.to_string());
        if created {
            tracing::debug!(queue, "queue declared");
        }
        Ok(created)
    }

    pub fn has_exchange(&self, exchange: &str) -> bool {
        self.inner.read().exchanges.contains_key(exchange)
    }

    pub fn has_queue(&self, queue: &str) -> bool {
        self.inner.read().queues.contains(queue)
    }

    /// Bind `queue` to `exchange` under `binding_key`.
    ///
    /// Both ends must be declared. Returns false when the binding already
    /// existed; rebinding is not an error.
    pub fn bind(&self, queue: &str, binding_key: &str, exchange: &str) -> Result<bool> {
        if binding_key.is_empty() {
            return Err(ExchangeError::EmptyBindingKey);
        }
        let mut inner = self.inner.write();
        if !inner.queues.contains(queue) {
            return Err(ExchangeError::UnknownQueue(queue.to_string()));
        }
        let table = inner
            .exchanges
            .get_mut(exchange)
            .ok_or_else(|| ExchangeError::UnknownExchange(exchange.to_string()))?;
        let created = table
            .by_queue
            .entry(queue.to_string())
            .or_default()
            .insert(binding_key.to_string());
        tracing::debug!(exchange, queue, binding_key, created, "bind");
        Ok(created)
    }

    /// Remove a binding. Returns false when nothing was bound, including when
    /// the exchange or queue is unknown.
    pub fn unbind(&self, queue: &str, binding_key: &str, exchange: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let Some(table) = inner.exchanges.get_mut(exchange) else {
            return Ok(false);
        };
        let Some(keys) = table.by_queue.get_mut(queue) else {
            return Ok(false);
        };
        let removed = keys.remove(binding_key);
        if keys.is_empty() {
            table.by_queue.remove(queue);
        }
        tracing::debug!(exchange, queue, binding_key, removed, "unbind");
        Ok(removed)
    }

    pub fn is_bound(&self, queue: &str, binding_key: &str, exchange: &str) -> bool {
        self.inner
            .read()
            .exchanges
            .get(exchange)
            .and_then(|table| table.by_queue.get(queue))
            .is_some_and(|keys| keys.contains(binding_key))
    }

    /// All bindings on an exchange, sorted by queue then key.
    pub fn bindings(&self, exchange: &str) -> Vec<Binding> {
        let inner = self.inner.read();
        let Some(table) = inner.exchanges.get(exchange) else {
            return Vec::new();
        };
        let mut out: Vec<Binding> = table
            .by_queue
            .iter()
            .flat_map(|(queue, keys)| {
                keys.iter().map(move |key| Binding {
                    exchange: exchange.to_string(),
                    queue: queue.clone(),
                    binding_key: key.clone(),
                })
            })
            .collect();
        out.sort();
        out
    }

    /// Queues that would receive a message published to `exchange` with
    /// `routing_key`. Sorted and deduplicated.
    pub fn route(&self, exchange: &str, routing_key: &str) -> Vec<String> {
        let inner = self.inner.read();
        let Some(table) = inner.exchanges.get(exchange) else {
            return Vec::new();
        };
        let mut queues: Vec<String> = table
            .by_queue
            .iter()
            .filter(|(_, keys)| keys.iter().any(|key| pattern::matches(key, routing_key)))
            .map(|(queue, _)| queue.clone())
            .collect();
        queues.sort();
        queues
    }
}
