//! Topic lifecycle.
use super::{TopologyService, name_or_generated, read_many_as};
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Predicate, ResourceId, ResourceKind, Subscription, Topic};

#[derive(Debug, Clone, Default)]
pub struct NewTopic {
    pub name: String,
    pub exchange_point: String,
    pub parent_topic_id: Option<ResourceId>,
    pub description: String,
}

impl TopologyService {
    /// Create a topic, optionally under a parent on the same exchange point.
    ///
    /// The exchange point match is checked here only. Topics have no update
    /// operation, so the check cannot go stale.
    pub async fn create_topic(&self, request: NewTopic) -> ServiceResult<ResourceId> {
        if request.exchange_point.is_empty() {
            return Err(ServiceError::bad_request("topic exchange point is required"));
        }
        let parent_ids: Vec<ResourceId> = request.parent_topic_id.into_iter().collect();
        let _parent_guard = self.lock_entities(&parent_ids).await;
        let parent = match &request.parent_topic_id {
            Some(parent_id) => {
                let parent: Topic = self.read_as(parent_id).await?;
                if parent.exchange_point != request.exchange_point {
                    return Err(ServiceError::bad_request(format!(
                        "topic exchange point {} does not match parent {} on {}",
                        request.exchange_point, parent.name, parent.exchange_point
                    )));
                }
                Some(parent)
            }
            None => None,
        };

        let topic = Topic {
            id: ResourceId::new(),
            name: name_or_generated(request.name),
            description: request.description,
            exchange_point: request.exchange_point,
        };
        let id = self.catalog.create(topic.clone().into()).await?;
        if let Some(parent) = &parent {
            self.graph.link(&parent.id, Predicate::ParentOf, &id).await?;
        }
        tracing::info!(
            topic = %topic.name,
            %id,
            exchange_point = %topic.exchange_point,
            parent = ?parent.as_ref().map(|p| p.id),
            "topic created"
        );
        Ok(id)
    }

    pub async fn read_topic(&self, id: &ResourceId) -> ServiceResult<Topic> {
        self.read_as(id).await
    }

    /// Delete a leaf topic. Every edge touching it goes with it.
    ///
    /// A topic inside the aggregated subtree of an active subscription is
    /// refused: deactivation rebuilds its bindings from the graph, so the
    /// topic's binding would otherwise stay on the broker.
    pub async fn delete_topic(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let topic = self.read_topic(id).await?;
        if self.graph.has_objects(id, Predicate::ParentOf).await? {
            return Err(ServiceError::bad_request(format!(
                "topic {} has child topics",
                topic.name
            )));
        }
        if let Some(subscription) = self.active_aggregator(id).await? {
            return Err(ServiceError::bad_request(format!(
                "topic {} is bound by active subscription {}",
                topic.name, subscription.name
            )));
        }
        self.remove(id).await?;
        tracing::info!(topic = %topic.name, %id, "topic deleted");
        Ok(())
    }

    /// First active subscription aggregating `topic` or one of its ancestors.
    async fn active_aggregator(&self, topic: &ResourceId) -> ServiceResult<Option<Subscription>> {
        for ancestor in self.tree.ancestors(topic).await? {
            let ids = self
                .graph
                .subjects_of(&ancestor, Predicate::AggregatesTopic)
                .await?;
            let subscriptions: Vec<Subscription> =
                read_many_as(self.catalog.as_ref(), &ids).await?;
            if let Some(active) = subscriptions.into_iter().find(|s| s.activated) {
                return Ok(Some(active));
            }
        }
        Ok(None)
    }

    /// Direct children of `topic`.
    pub async fn find_topics_by_topic(&self, topic: &ResourceId) -> ServiceResult<Vec<ResourceId>> {
        let _: Topic = self.read_as(topic).await?;
        self.tree.children(topic).await
    }

    /// Topics are not name-unique; every match is returned.
    pub async fn find_topics_by_name(&self, name: &str) -> ServiceResult<Vec<ResourceId>> {
        self.named(ResourceKind::Topic, name).await
    }
}
