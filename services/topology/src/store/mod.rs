//! Catalog abstraction.
//!
//! # Purpose
//! The catalog owns resources and the association edges between them. The
//! topology service only ever holds identifiers and short-lived copies read
//! during a single operation; every cross-call fact lives here.
//!
//! # Consistency
//! Each call is individually consistent. Nothing is linearizable across calls,
//! so graph traversals that span several round-trips see a weakly consistent
//! view of the topology.
use crate::model::{
    Association, AssociationId, Predicate, Resource, ResourceChange, ResourceId, ResourceKind,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub changes_limit: u64,
    pub change_retention_max_rows: Option<i64>,
}

impl StoreConfig {
    pub fn change_window(&self) -> usize {
        self.change_retention_max_rows
            .unwrap_or(self.changes_limit as i64)
            .max(self.changes_limit as i64) as usize
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub next_seq: u64,
}

#[derive(Debug, Clone)]
pub struct ChangeSet<T> {
    pub items: Vec<T>,
    pub next_seq: u64,
}

/// Neighbors of a node along matching edges: the resources on the far side
/// and the ids of the edges that reach them, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub resources: Vec<ResourceId>,
    pub associations: Vec<AssociationId>,
}

impl Neighbors {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid association: {0}")]
    InvalidAssociation(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Insert a new resource. Fails with `Conflict` if the id is taken.
    async fn create(&self, resource: Resource) -> StoreResult<ResourceId>;
    async fn read(&self, id: &ResourceId) -> StoreResult<Resource>;
    /// Read several resources, preserving request order. Any missing id fails
    /// the whole call.
    async fn read_multiple(&self, ids: &[ResourceId]) -> StoreResult<Vec<Resource>>;
    /// Replace an existing resource. The kind must not change.
    async fn update(&self, resource: Resource) -> StoreResult<()>;
    /// Remove a resource. Edges are not touched; callers detach them first.
    async fn delete(&self, id: &ResourceId) -> StoreResult<()>;
    async fn find_resources_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> StoreResult<Vec<ResourceId>>;

    async fn create_association(
        &self,
        subject: &ResourceId,
        predicate: Predicate,
        object: &ResourceId,
    ) -> StoreResult<AssociationId>;
    async fn delete_association(&self, id: &AssociationId) -> StoreResult<()>;
    async fn find_objects(
        &self,
        subject: &ResourceId,
        predicate: Option<Predicate>,
        object_kind: Option<ResourceKind>,
    ) -> StoreResult<Neighbors>;
    async fn find_subjects(
        &self,
        object: &ResourceId,
        predicate: Option<Predicate>,
        subject_kind: Option<ResourceKind>,
    ) -> StoreResult<Neighbors>;
    /// Bulk edge lookup for tree expansion: every edge whose subject is in
    /// `subjects`.
    async fn find_associations_for_subjects(
        &self,
        subjects: &[ResourceId],
        predicate: Option<Predicate>,
    ) -> StoreResult<Vec<Association>>;

    async fn resource_snapshot(&self) -> StoreResult<Snapshot<Resource>>;
    async fn resource_changes(&self, since: u64) -> StoreResult<ChangeSet<ResourceChange>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
