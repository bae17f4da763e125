//! Topology service: entity lifecycle and subscription activation.
//!
//! # Purpose
//! `TopologyService` is the public surface consumed by the HTTP layer and by
//! embedding callers. It validates requests, records entities and edges in the
//! catalog, and drives the binding coordinator when subscriptions change state.
//!
//! # Concurrency
//! The service holds no topology state of its own; everything lives in the
//! catalog. Two keyed lock tables close the races the catalog cannot:
//! - `(kind, name)` locks make the name-uniqueness check and the insert one step.
//! - Per-entity locks serialize flag flips and deletes on the same entity, so two
//!   concurrent `activate` calls cannot both bind.
//! - Creates hold the entity locks of everything they link to, so a referenced
//!   entity cannot be deleted between validation and linking. Multiple locks
//!   are always taken in id order.
//!
//! The lock tables are in-process. Running several service replicas against a
//! shared catalog would need a catalog-side guard instead.
use crate::broker::Broker;
use crate::error::{ServiceError, ServiceResult};
use crate::graph::{AssociationGraph, TopicTree};
use crate::locks::{KeyedGuard, KeyedLocks};
use crate::model::{ResourceId, ResourceKind, ResourceVariant};
use crate::store::Catalog;
use std::sync::Arc;

pub mod bindings;
mod definitions;
mod streams;
mod subscriptions;
mod topics;

pub use bindings::{BindingCoordinator, BindingPlan, BindingSource, PlannedBinding};
pub use definitions::NewStreamDefinition;
pub use streams::NewStream;
pub use subscriptions::NewSubscription;
pub use topics::NewTopic;

#[derive(Clone)]
pub struct TopologyService {
    catalog: Arc<dyn Catalog>,
    graph: AssociationGraph,
    tree: TopicTree,
    bindings: BindingCoordinator,
    entity_locks: KeyedLocks<ResourceId>,
    name_locks: KeyedLocks<(ResourceKind, String)>,
}

impl TopologyService {
    pub fn new(catalog: Arc<dyn Catalog>, broker: Arc<dyn Broker>) -> Self {
        let graph = AssociationGraph::new(Arc::clone(&catalog));
        let tree = TopicTree::new(graph.clone());
        let bindings = BindingCoordinator::new(
            Arc::clone(&catalog),
            broker,
            graph.clone(),
            tree.clone(),
        );
        Self {
            catalog,
            graph,
            tree,
            bindings,
            entity_locks: KeyedLocks::new(),
            name_locks: KeyedLocks::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn graph(&self) -> &AssociationGraph {
        &self.graph
    }

    pub fn topic_tree(&self) -> &TopicTree {
        &self.tree
    }

    pub fn bindings(&self) -> &BindingCoordinator {
        &self.bindings
    }

    async fn lock_entity(&self, id: ResourceId) -> KeyedGuard<ResourceId> {
        self.entity_locks.lock(id).await
    }

    /// Lock every id in ascending order. Callers that need several entity
    /// locks must come through here so two of them never wait on each other.
    async fn lock_entities(&self, ids: &[ResourceId]) -> Vec<KeyedGuard<ResourceId>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.entity_locks.lock(id).await);
        }
        guards
    }

    /// Lock a `(kind, name)` pair for a check-then-insert. Empty names get a
    /// generated unique name later and need no lock.
    async fn lock_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Option<KeyedGuard<(ResourceKind, String)>> {
        if name.is_empty() {
            return None;
        }
        Some(self.name_locks.lock((kind, name.to_string())).await)
    }

    async fn named(&self, kind: ResourceKind, name: &str) -> ServiceResult<Vec<ResourceId>> {
        if name.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.catalog.find_resources_by_name(kind, name).await?)
    }

    async fn read_as<T: ResourceVariant>(&self, id: &ResourceId) -> ServiceResult<T> {
        read_as(self.catalog.as_ref(), id).await
    }

    /// Detach every edge, then delete the entity.
    async fn remove(&self, id: &ResourceId) -> ServiceResult<()> {
        self.graph.detach(id).await?;
        self.catalog.delete(id).await?;
        Ok(())
    }
}

/// Read `id` and narrow it to `T`. A resource of another kind is a bad request.
pub(crate) async fn read_as<T: ResourceVariant>(
    catalog: &dyn Catalog,
    id: &ResourceId,
) -> ServiceResult<T> {
    let resource = catalog.read(id).await?;
    T::from_resource(resource).map_err(|other| ServiceError::wrong_kind(id, T::KIND, other.kind()))
}

/// Bulk variant of `read_as`, preserving request order.
pub(crate) async fn read_many_as<T: ResourceVariant>(
    catalog: &dyn Catalog,
    ids: &[ResourceId],
) -> ServiceResult<Vec<T>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    catalog
        .read_multiple(ids)
        .await?
        .into_iter()
        .map(|resource| {
            let id = resource.id();
            T::from_resource(resource)
                .map_err(|other| ServiceError::wrong_kind(&id, T::KIND, other.kind()))
        })
        .collect()
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup_ids(ids: &[ResourceId]) -> Vec<ResourceId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn name_or_generated(name: String) -> String {
    if name.is_empty() {
        switchyard_common::unique_name()
    } else {
        name
    }
}
