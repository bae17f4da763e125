//! Association graph over catalog resources.
//!
//! # Purpose
//! A thin, predicate-aware view of the catalog's edge store. Each query filters
//! on both the predicate and the kind it implies for the far endpoint, so
//! callers never re-check the kind of what comes back.
use crate::model::{Association, AssociationId, Predicate, ResourceId};
use crate::store::{Catalog, StoreResult};
use std::collections::HashSet;
use std::sync::Arc;

pub mod tree;

pub use tree::TopicTree;

#[derive(Clone)]
pub struct AssociationGraph {
    catalog: Arc<dyn Catalog>,
}

impl AssociationGraph {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub async fn link(
        &self,
        subject: &ResourceId,
        predicate: Predicate,
        object: &ResourceId,
    ) -> StoreResult<AssociationId> {
        let id = self
            .catalog
            .create_association(subject, predicate, object)
            .await?;
        tracing::debug!(%subject, %predicate, %object, association = %id, "edge created");
        Ok(id)
    }

    pub async fn unlink(&self, id: &AssociationId) -> StoreResult<()> {
        self.catalog.delete_association(id).await
    }

    /// Objects reached from `subject` along `predicate` edges.
    pub async fn objects_of(
        &self,
        subject: &ResourceId,
        predicate: Predicate,
    ) -> StoreResult<Vec<ResourceId>> {
        Ok(self
            .catalog
            .find_objects(subject, Some(predicate), Some(predicate.object_kind()))
            .await?
            .resources)
    }

    /// Subjects pointing at `object` along `predicate` edges.
    pub async fn subjects_of(
        &self,
        object: &ResourceId,
        predicate: Predicate,
    ) -> StoreResult<Vec<ResourceId>> {
        Ok(self
            .catalog
            .find_subjects(object, Some(predicate), Some(predicate.subject_kind()))
            .await?
            .resources)
    }

    pub async fn has_objects(&self, subject: &ResourceId, predicate: Predicate) -> StoreResult<bool> {
        Ok(!self.objects_of(subject, predicate).await?.is_empty())
    }

    pub async fn has_subjects(&self, object: &ResourceId, predicate: Predicate) -> StoreResult<bool> {
        Ok(!self.subjects_of(object, predicate).await?.is_empty())
    }

    /// All `predicate` edges leaving any node in `subjects`, in one round-trip.
    pub async fn edges_from(
        &self,
        subjects: &[ResourceId],
        predicate: Predicate,
    ) -> StoreResult<Vec<Association>> {
        if subjects.is_empty() {
            return Ok(Vec::new());
        }
        self.catalog
            .find_associations_for_subjects(subjects, Some(predicate))
            .await
    }

    /// Delete every edge touching `id`, in either direction. Returns how many
    /// edges were removed.
    pub async fn detach(&self, id: &ResourceId) -> StoreResult<usize> {
        let outgoing = self.catalog.find_objects(id, None, None).await?;
        let incoming = self.catalog.find_subjects(id, None, None).await?;
        // A self-loop shows up on both sides; delete it once.
        let edges: HashSet<AssociationId> = outgoing
            .associations
            .into_iter()
            .chain(incoming.associations)
            .collect();
        let removed = edges.len();
        for edge in &edges {
            self.unlink(edge).await?;
        }
        tracing::debug!(resource = %id, removed, "edges detached");
        Ok(removed)
    }
}
