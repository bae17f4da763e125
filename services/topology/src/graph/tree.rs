//! Topic hierarchy traversal.
//!
//! # Purpose
//! Topics form a forest through `ParentOf` edges. This module walks it upward
//! (ancestors) and downward (descendants).
//!
//! # Invariants
//! - A topic has at most one parent. The ancestor walk reports a violation as
//!   an integrity error instead of picking one.
//! - Traversal state (visited set, frontier) lives on the stack of a single
//!   call; nothing is shared between calls.
//! - Both walks are cycle-safe even though topic creation cannot build a cycle.
//! - Each frontier expansion is a separate catalog round-trip, so a topic added
//!   concurrently may or may not be included.
use super::AssociationGraph;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Predicate, ResourceId};
use std::collections::HashSet;

#[derive(Clone)]
pub struct TopicTree {
    graph: AssociationGraph,
}

impl TopicTree {
    pub fn new(graph: AssociationGraph) -> Self {
        Self { graph }
    }

    /// Parent of `topic`, if any.
    pub async fn parent(&self, topic: &ResourceId) -> ServiceResult<Option<ResourceId>> {
        let parents = self.graph.subjects_of(topic, Predicate::ParentOf).await?;
        match parents.as_slice() {
            [] => Ok(None),
            [parent] => Ok(Some(*parent)),
            many => Err(ServiceError::Integrity(format!(
                "topic {topic} has {} parents",
                many.len()
            ))),
        }
    }

    /// Direct children of `topic`.
    pub async fn children(&self, topic: &ResourceId) -> ServiceResult<Vec<ResourceId>> {
        Ok(self.graph.objects_of(topic, Predicate::ParentOf).await?)
    }

    /// `topic` followed by its parent, grandparent, and so on up to the root.
    pub async fn ancestors(&self, topic: &ResourceId) -> ServiceResult<Vec<ResourceId>> {
        let mut path = vec![*topic];
        let mut seen = HashSet::from([*topic]);
        let mut current = *topic;
        while let Some(parent) = self.parent(&current).await? {
            if !seen.insert(parent) {
                return Err(ServiceError::Integrity(format!(
                    "topic {topic} has a cycle in its ancestry at {parent}"
                )));
            }
            path.push(parent);
            current = parent;
        }
        Ok(path)
    }

    /// `topic` and every topic below it, breadth-first and without duplicates.
    pub async fn descendants(&self, topic: &ResourceId) -> ServiceResult<Vec<ResourceId>> {
        let mut visited = HashSet::from([*topic]);
        let mut order = vec![*topic];
        let mut frontier = vec![*topic];
        while !frontier.is_empty() {
            let edges = self.graph.edges_from(&frontier, Predicate::ParentOf).await?;
            let mut next = Vec::new();
            for edge in edges {
                if visited.insert(edge.object) {
                    order.push(edge.object);
                    next.push(edge.object);
                }
            }
            frontier = next;
        }
        Ok(order)
    }

    /// Union of the descendant sets of every root, first-seen order.
    pub async fn expand(&self, roots: &[ResourceId]) -> ServiceResult<Vec<ResourceId>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for root in roots {
            if seen.contains(root) {
                continue;
            }
            for topic in self.descendants(root).await? {
                if seen.insert(topic) {
                    out.push(topic);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, Topic};
    use crate::store::memory::InMemoryCatalog;
    use crate::store::{Catalog, StoreConfig};
    use std::sync::Arc;

    struct Fixture {
        catalog: Arc<dyn Catalog>,
        tree: TopicTree,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog: Arc<dyn Catalog> = Arc::new(InMemoryCatalog::new(StoreConfig {
                changes_limit: 100,
                change_retention_max_rows: None,
            }));
            let tree = TopicTree::new(AssociationGraph::new(Arc::clone(&catalog)));
            Self { catalog, tree }
        }

        async fn topic(&self, name: &str, parent: Option<ResourceId>) -> ResourceId {
            let id = self
                .catalog
                .create(Resource::Topic(Topic {
                    id: ResourceId::new(),
                    name: name.to_string(),
                    description: String::new(),
                    exchange_point: "xp".to_string(),
                }))
                .await
                .expect("topic");
            if let Some(parent) = parent {
                self.edge(parent, id).await;
            }
            id
        }

        async fn edge(&self, parent: ResourceId, child: ResourceId) {
            self.catalog
                .create_association(&parent, Predicate::ParentOf, &child)
                .await
                .expect("edge");
        }
    }

    #[tokio::test]
    async fn descendants_include_self_and_every_level() {
        let fx = Fixture::new();
        let root = fx.topic("root", None).await;
        let a = fx.topic("a", Some(root)).await;
        let b = fx.topic("b", Some(root)).await;
        let a1 = fx.topic("a1", Some(a)).await;
        let unrelated = fx.topic("other", None).await;

        let found = fx.tree.descendants(&root).await.expect("descendants");
        assert_eq!(found[0], root);
        assert_eq!(found.len(), 4);
        let set: HashSet<_> = found.iter().copied().collect();
        assert_eq!(set, HashSet::from([root, a, b, a1]));
        assert!(!set.contains(&unrelated));
        // Breadth-first: the grandchild comes after both children.
        let pos = |id| found.iter().position(|x| *x == id).expect("present");
        assert!(pos(a1) > pos(a) && pos(a1) > pos(b));

        assert_eq!(fx.tree.descendants(&a1).await.expect("leaf"), vec![a1]);
    }

    #[tokio::test]
    async fn descendants_terminate_on_cycles() {
        let fx = Fixture::new();
        let x = fx.topic("x", None).await;
        let y = fx.topic("y", Some(x)).await;
        fx.edge(y, x).await;
        let found = fx.tree.descendants(&x).await.expect("descendants");
        assert_eq!(found, vec![x, y]);
    }

    #[tokio::test]
    async fn ancestors_walk_to_the_root() {
        let fx = Fixture::new();
        let root = fx.topic("root", None).await;
        let mid = fx.topic("mid", Some(root)).await;
        let leaf = fx.topic("leaf", Some(mid)).await;
        assert_eq!(
            fx.tree.ancestors(&leaf).await.expect("ancestors"),
            vec![leaf, mid, root]
        );
        assert_eq!(fx.tree.ancestors(&root).await.expect("root"), vec![root]);
    }

    #[tokio::test]
    async fn ancestors_reject_multiple_parents() {
        let fx = Fixture::new();
        let p1 = fx.topic("p1", None).await;
        let p2 = fx.topic("p2", None).await;
        let child = fx.topic("child", Some(p1)).await;
        fx.edge(p2, child).await;
        let err = fx.tree.ancestors(&child).await.expect_err("two parents");
        assert!(matches!(err, ServiceError::Integrity(_)));
    }

    #[tokio::test]
    async fn ancestors_reject_cycles() {
        let fx = Fixture::new();
        let x = fx.topic("x", None).await;
        let y = fx.topic("y", Some(x)).await;
        fx.edge(y, x).await;
        let err = fx.tree.ancestors(&y).await.expect_err("cycle");
        assert!(matches!(err, ServiceError::Integrity(_)));
    }

    #[tokio::test]
    async fn expand_merges_overlapping_subtrees() {
        let fx = Fixture::new();
        let root = fx.topic("root", None).await;
        let leaf = fx.topic("leaf", Some(root)).await;
        let expanded = fx.tree.expand(&[leaf, root]).await.expect("expand");
        assert_eq!(expanded, vec![leaf, root]);
        assert_eq!(fx.tree.children(&root).await.expect("children"), vec![leaf]);
        assert_eq!(fx.tree.parent(&leaf).await.expect("parent"), Some(root));
    }
}
