//! Binding coordinator.
//!
//! # Purpose
//! Turns a subscription's aggregation edges into broker bindings and back.
//!
//! # Plan order
//! A plan lists bindings in a fixed order: directly aggregated streams, then
//! whole exchange points, then every topic in the aggregated subtrees. Bind and
//! unbind both walk the plan in that order.
//!
//! # Failure semantics
//! A failing broker call stops the walk and surfaces the error. Bindings that
//! already succeeded stay in place; the caller keeps the subscription in its
//! previous state and a retry converges because the broker treats repeated
//! binds and unbinds of the same key as no-ops.
use super::read_many_as;
use crate::broker::Broker;
use crate::error::ServiceResult;
use crate::graph::{AssociationGraph, TopicTree};
use crate::model::{Predicate, ResourceId, Stream, Subscription, Topic};
use crate::routing::{EXCHANGE_WILDCARD, topic_pattern};
use crate::store::Catalog;
use std::collections::HashSet;
use std::sync::Arc;

/// What put a binding into the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    Stream(ResourceId),
    ExchangePoint,
    Topic(ResourceId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBinding {
    pub exchange: String,
    pub binding_key: String,
    pub source: BindingSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    /// Queue every binding targets: the subscription's exchange name.
    pub queue: String,
    pub bindings: Vec<PlannedBinding>,
}

impl BindingPlan {
    fn new(queue: &str) -> Self {
        Self {
            queue: queue.to_string(),
            bindings: Vec::new(),
        }
    }

    /// Append unless the same `(exchange, binding_key)` is already planned.
    fn push(&mut self, exchange: &str, binding_key: &str, source: BindingSource) {
        if self
            .bindings
            .iter()
            .any(|b| b.exchange == exchange && b.binding_key == binding_key)
        {
            return;
        }
        self.bindings.push(PlannedBinding {
            exchange: exchange.to_string(),
            binding_key: binding_key.to_string(),
            source,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

#[derive(Clone)]
pub struct BindingCoordinator {
    catalog: Arc<dyn Catalog>,
    broker: Arc<dyn Broker>,
    graph: AssociationGraph,
    tree: TopicTree,
}

impl BindingCoordinator {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        broker: Arc<dyn Broker>,
        graph: AssociationGraph,
        tree: TopicTree,
    ) -> Self {
        Self {
            catalog,
            broker,
            graph,
            tree,
        }
    }

    /// Resolve every binding `subscription` implies right now.
    pub async fn plan(&self, subscription: &Subscription) -> ServiceResult<BindingPlan> {
        let mut plan = BindingPlan::new(&subscription.exchange_name);

        let stream_ids = self
            .graph
            .objects_of(&subscription.id, Predicate::HasStream)
            .await?;
        let streams: Vec<Stream> = read_many_as(self.catalog.as_ref(), &stream_ids).await?;
        for stream in &streams {
            plan.push(
                &stream.route.exchange_point,
                &stream.route.routing_key,
                BindingSource::Stream(stream.id),
            );
        }

        for exchange_point in &subscription.exchange_points {
            plan.push(exchange_point, EXCHANGE_WILDCARD, BindingSource::ExchangePoint);
        }

        let roots = self
            .graph
            .objects_of(&subscription.id, Predicate::AggregatesTopic)
            .await?;
        let topic_ids = self.tree.expand(&roots).await?;
        let topics: Vec<Topic> = read_many_as(self.catalog.as_ref(), &topic_ids).await?;
        for topic in &topics {
            plan.push(
                &topic.exchange_point,
                &topic_pattern(&topic.name),
                BindingSource::Topic(topic.id),
            );
        }
        Ok(plan)
    }

    /// Declare and bind every planned binding, in plan order.
    pub async fn bind(&self, plan: &BindingPlan) -> ServiceResult<()> {
        let mut declared = HashSet::new();
        for binding in &plan.bindings {
            if declared.insert(binding.exchange.as_str()) {
                self.broker.declare_exchange(&binding.exchange).await?;
            }
            self.broker.declare_queue(&plan.queue).await?;
            if let Err(err) = self
                .broker
                .bind(&plan.queue, &binding.binding_key, &binding.exchange)
                .await
            {
                tracing::warn!(
                    queue = %plan.queue,
                    exchange = %binding.exchange,
                    binding_key = %binding.binding_key,
                    error = %err,
                    "bind failed; earlier bindings are left in place"
                );
                return Err(err.into());
            }
            metrics::counter!("switchyard_bindings_total", "op" => "bind").increment(1);
            tracing::debug!(
                queue = %plan.queue,
                exchange = %binding.exchange,
                binding_key = %binding.binding_key,
                "bound"
            );
        }
        Ok(())
    }

    /// Unbind every planned binding, in plan order.
    pub async fn unbind(&self, plan: &BindingPlan) -> ServiceResult<()> {
        for binding in &plan.bindings {
            if let Err(err) = self
                .broker
                .unbind(&plan.queue, &binding.binding_key, &binding.exchange)
                .await
            {
                tracing::warn!(
                    queue = %plan.queue,
                    exchange = %binding.exchange,
                    binding_key = %binding.binding_key,
                    error = %err,
                    "unbind failed; earlier unbinds are not restored"
                );
                return Err(err.into());
            }
            metrics::counter!("switchyard_bindings_total", "op" => "unbind").increment(1);
            tracing::debug!(
                queue = %plan.queue,
                exchange = %binding.exchange,
                binding_key = %binding.binding_key,
                "unbound"
            );
        }
        Ok(())
    }
}
