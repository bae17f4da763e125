//! In-memory implementation of the catalog.
//!
//! # Purpose
//! Implements `Catalog` entirely in memory using `HashMap`s guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where the topology can be rebuilt on restart
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: every call is consistent on its own. Write
//!   locks serialize mutations, read locks allow concurrent lookups.
//! - Lock order is always resources, then associations, then the change log.
//!
//! # Change stream
//! Resource mutations are appended to a bounded change log
//! (`StoreConfig::change_window`). Consumers that fall behind the window must
//! re-bootstrap from `resource_snapshot()`.
//!
//! # Performance characteristics
//! Name lookups and edge queries scan their map. That is fine for control-plane
//! sized topologies and keeps the store free of secondary indexes to maintain.
use super::{ChangeSet, Catalog, Neighbors, Snapshot, StoreConfig, StoreError, StoreResult};
use crate::model::{
    Association, AssociationId, Predicate, Resource, ResourceChange, ResourceChangeOp,
    ResourceId, ResourceKind,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

const ALL_KINDS: [ResourceKind; 4] = [
    ResourceKind::StreamDefinition,
    ResourceKind::Stream,
    ResourceKind::Topic,
    ResourceKind::Subscription,
];

/// Bounded, in-memory append-only log of resource changes.
///
/// `record()` assigns the next sequence number, appends the change, and evicts
/// the oldest entries once capacity is exceeded.
#[derive(Debug)]
struct ChangeLog<T> {
    next_seq: u64,
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> ChangeLog<T> {
    fn new(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    fn record(&mut self, item: impl FnOnce(u64) -> T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push_back(item(seq));
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
        seq
    }
}

/// In-memory catalog.
///
/// All maps are wrapped in `Arc<RwLock<...>>` so the catalog can be shared
/// across request handlers, reads proceed concurrently and writes are
/// serialized.
pub struct InMemoryCatalog {
    config: StoreConfig,
    /// Authoritative resources keyed by id.
    resources: Arc<RwLock<HashMap<ResourceId, Resource>>>,
    /// Association edges keyed by edge id.
    associations: Arc<RwLock<HashMap<AssociationId, Association>>>,
    /// Bounded change log for resource mutations.
    changes: Arc<RwLock<ChangeLog<ResourceChange>>>,
}

impl InMemoryCatalog {
    pub fn new(config: StoreConfig) -> Self {
        let capacity = config.change_window();
        Self {
            config,
            resources: Arc::new(RwLock::new(HashMap::new())),
            associations: Arc::new(RwLock::new(HashMap::new())),
            changes: Arc::new(RwLock::new(ChangeLog::new(capacity))),
        }
    }

    fn limit(&self) -> usize {
        self.config.changes_limit as usize
    }

    async fn record_change(&self, op: ResourceChangeOp, resource: &Resource) {
        let kind = resource.kind();
        let id = resource.id();
        let payload = match op {
            ResourceChangeOp::Deleted => None,
            _ => Some(resource.clone()),
        };
        self.changes.write().await.record(|seq| ResourceChange {
            seq,
            op,
            id,
            kind,
            resource: payload,
        });
        metrics::counter!(
            "switchyard_resource_changes_total",
            "kind" => kind.as_str(),
            "op" => op.as_str()
        )
        .increment(1);
    }
}

fn publish_resource_gauges(resources: &HashMap<ResourceId, Resource>) {
    for kind in ALL_KINDS {
        let count = resources.values().filter(|r| r.kind() == kind).count();
        metrics::gauge!("switchyard_resources_total", "kind" => kind.as_str()).set(count as f64);
    }
}

fn check_kind(
    resources: &HashMap<ResourceId, Resource>,
    id: &ResourceId,
    expected: ResourceKind,
    role: &str,
) -> StoreResult<()> {
    let resource = resources
        .get(id)
        .ok_or_else(|| StoreError::NotFound(format!("{role} {id}")))?;
    if resource.kind() != expected {
        return Err(StoreError::InvalidAssociation(format!(
            "{role} {id} is a {}, expected a {expected}",
            resource.kind()
        )));
    }
    Ok(())
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn create(&self, resource: Resource) -> StoreResult<ResourceId> {
        let id = resource.id();
        let mut resources = self.resources.write().await;
        if resources.contains_key(&id) {
            return Err(StoreError::Conflict(format!("resource {id} exists")));
        }
        resources.insert(id, resource.clone());
        publish_resource_gauges(&resources);
        self.record_change(ResourceChangeOp::Created, &resource).await;
        Ok(id)
    }

    async fn read(&self, id: &ResourceId) -> StoreResult<Resource> {
        self.resources
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("resource {id}")))
    }

    async fn read_multiple(&self, ids: &[ResourceId]) -> StoreResult<Vec<Resource>> {
        let resources = self.resources.read().await;
        ids.iter()
            .map(|id| {
                resources
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(format!("resource {id}")))
            })
            .collect()
    }

    async fn update(&self, resource: Resource) -> StoreResult<()> {
        let id = resource.id();
        let mut resources = self.resources.write().await;
        let existing = resources
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("resource {id}")))?;
        if existing.kind() != resource.kind() {
            return Err(StoreError::Conflict(format!(
                "resource {id} is a {}, refusing to replace it with a {}",
                existing.kind(),
                resource.kind()
            )));
        }
        *existing = resource.clone();
        drop(resources);
        self.record_change(ResourceChangeOp::Updated, &resource).await;
        Ok(())
    }

    async fn delete(&self, id: &ResourceId) -> StoreResult<()> {
        let mut resources = self.resources.write().await;
        let removed = resources
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("resource {id}")))?;
        publish_resource_gauges(&resources);
        drop(resources);
        self.record_change(ResourceChangeOp::Deleted, &removed).await;
        Ok(())
    }

    async fn find_resources_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> StoreResult<Vec<ResourceId>> {
        Ok(self
            .resources
            .read()
            .await
            .values()
            .filter(|r| r.kind() == kind && r.name() == name)
            .map(Resource::id)
            .collect())
    }

    async fn create_association(
        &self,
        subject: &ResourceId,
        predicate: Predicate,
        object: &ResourceId,
    ) -> StoreResult<AssociationId> {
        // Hold the resource read lock so neither endpoint can vanish mid-insert.
        let resources = self.resources.read().await;
        check_kind(&resources, subject, predicate.subject_kind(), "subject")?;
        check_kind(&resources, object, predicate.object_kind(), "object")?;

        let mut associations = self.associations.write().await;
        // Edges form a set: re-creating an identical edge returns the original.
        if let Some(existing) = associations.values().find(|a| {
            a.subject == *subject && a.predicate == predicate && a.object == *object
        }) {
            return Ok(existing.id);
        }
        let id = AssociationId::new();
        associations.insert(
            id,
            Association {
                id,
                subject: *subject,
                predicate,
                object: *object,
            },
        );
        metrics::gauge!("switchyard_associations_total").set(associations.len() as f64);
        Ok(id)
    }

    async fn delete_association(&self, id: &AssociationId) -> StoreResult<()> {
        let mut associations = self.associations.write().await;
        if associations.remove(id).is_none() {
            return Err(StoreError::NotFound(format!("association {id}")));
        }
        metrics::gauge!("switchyard_associations_total").set(associations.len() as f64);
        Ok(())
    }

    async fn find_objects(
        &self,
        subject: &ResourceId,
        predicate: Option<Predicate>,
        object_kind: Option<ResourceKind>,
    ) -> StoreResult<Neighbors> {
        let resources = self.resources.read().await;
        let associations = self.associations.read().await;
        let mut neighbors = Neighbors::default();
        for edge in associations.values() {
            if edge.subject != *subject || predicate.is_some_and(|p| p != edge.predicate) {
                continue;
            }
            if let Some(kind) = object_kind {
                if resources.get(&edge.object).map(Resource::kind) != Some(kind) {
                    continue;
                }
            }
            neighbors.resources.push(edge.object);
            neighbors.associations.push(edge.id);
        }
        Ok(neighbors)
    }

    async fn find_subjects(
        &self,
        object: &ResourceId,
        predicate: Option<Predicate>,
        subject_kind: Option<ResourceKind>,
    ) -> StoreResult<Neighbors> {
        let resources = self.resources.read().await;
        let associations = self.associations.read().await;
        let mut neighbors = Neighbors::default();
        for edge in associations.values() {
            if edge.object != *object || predicate.is_some_and(|p| p != edge.predicate) {
                continue;
            }
            if let Some(kind) = subject_kind {
                if resources.get(&edge.subject).map(Resource::kind) != Some(kind) {
                    continue;
                }
            }
            neighbors.resources.push(edge.subject);
            neighbors.associations.push(edge.id);
        }
        Ok(neighbors)
    }

    async fn find_associations_for_subjects(
        &self,
        subjects: &[ResourceId],
        predicate: Option<Predicate>,
    ) -> StoreResult<Vec<Association>> {
        let subjects: HashSet<&ResourceId> = subjects.iter().collect();
        Ok(self
            .associations
            .read()
            .await
            .values()
            .filter(|edge| subjects.contains(&edge.subject))
            .filter(|edge| predicate.is_none_or(|p| p == edge.predicate))
            .cloned()
            .collect())
    }

    async fn resource_snapshot(&self) -> StoreResult<Snapshot<Resource>> {
        // `next_seq` is the checkpoint a consumer should use as `since` on its
        // first changes poll.
        let items = self.resources.read().await.values().cloned().collect();
        let next_seq = self.changes.read().await.next_seq;
        Ok(Snapshot { items, next_seq })
    }

    async fn resource_changes(&self, since: u64) -> StoreResult<ChangeSet<ResourceChange>> {
        // `since` is inclusive. A checkpoint older than the retained window
        // yields a partial history; the consumer should re-snapshot.
        let guard = self.changes.read().await;
        let items = guard
            .items
            .iter()
            .filter(|item| item.seq >= since)
            .take(self.limit())
            .cloned()
            .collect();
        Ok(ChangeSet {
            items,
            next_seq: guard.next_seq,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
