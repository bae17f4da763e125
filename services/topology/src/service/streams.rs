//! Stream lifecycle.
//!
//! A stream's route is fixed at creation: the routing key is derived from the
//! stream name and the names of the topics it was tagged with, and never
//! recomputed.
use super::{TopologyService, dedup_ids, name_or_generated, read_many_as};
use crate::error::{ServiceError, ServiceResult};
use crate::model::{
    Predicate, ResourceId, ResourceKind, Stream, StreamDefinition, StreamRoute, Topic,
};
use crate::routing::RoutingKeyBuilder;

#[derive(Debug, Clone, Default)]
pub struct NewStream {
    pub name: String,
    pub exchange_point: String,
    pub topic_ids: Vec<ResourceId>,
    pub credentials: Option<String>,
    pub stream_definition_id: Option<ResourceId>,
    pub description: String,
}

impl TopologyService {
    /// Create a stream and tag it with every requested topic on the same
    /// exchange point. Topics on other exchange points are skipped.
    pub async fn create_stream(
        &self,
        request: NewStream,
    ) -> ServiceResult<(ResourceId, StreamRoute)> {
        let _guard = self.lock_name(ResourceKind::Stream, &request.name).await;
        if !self.named(ResourceKind::Stream, &request.name).await?.is_empty() {
            return Err(ServiceError::conflict(format!(
                "stream {} already exists",
                request.name
            )));
        }
        if request.exchange_point.is_empty() {
            return Err(ServiceError::bad_request("stream exchange point is required"));
        }
        let topic_ids = dedup_ids(&request.topic_ids);
        let referenced: Vec<ResourceId> = topic_ids
            .iter()
            .copied()
            .chain(request.stream_definition_id)
            .collect();
        let _referenced_guards = self.lock_entities(&referenced).await;
        if let Some(definition) = &request.stream_definition_id {
            let _: StreamDefinition = self.read_as(definition).await?;
        }

        let name = name_or_generated(request.name);
        let requested: Vec<Topic> = read_many_as(self.catalog.as_ref(), &topic_ids).await?;
        let (accepted, skipped): (Vec<Topic>, Vec<Topic>) = requested
            .into_iter()
            .partition(|topic| topic.exchange_point == request.exchange_point);
        for topic in &skipped {
            tracing::warn!(
                stream = %name,
                topic = %topic.name,
                topic_exchange_point = %topic.exchange_point,
                exchange_point = %request.exchange_point,
                "skipping topic on a different exchange point"
            );
        }

        let routing_key = RoutingKeyBuilder::new(&name)
            .topics(accepted.iter().map(|topic| topic.name.as_str()))
            .build()?;
        let route = StreamRoute {
            exchange_point: request.exchange_point,
            routing_key,
            credentials: request.credentials,
        };
        let stream = Stream {
            id: ResourceId::new(),
            name,
            description: request.description,
            persisted: false,
            route: route.clone(),
        };
        let id = self.catalog.create(stream.clone().into()).await?;
        if let Some(definition) = &request.stream_definition_id {
            self.graph
                .link(&id, Predicate::HasStreamDefinition, definition)
                .await?;
        }
        for topic in &accepted {
            self.graph.link(&id, Predicate::TaggedWith, &topic.id).await?;
        }
        tracing::info!(
            stream = %stream.name,
            %id,
            routing_key = %route.routing_key,
            topics = accepted.len(),
            "stream created"
        );
        Ok((id, route))
    }

    pub async fn read_stream(&self, id: &ResourceId) -> ServiceResult<Stream> {
        self.read_as(id).await
    }

    pub async fn read_stream_route(&self, id: &ResourceId) -> ServiceResult<StreamRoute> {
        Ok(self.read_stream(id).await?.route)
    }

    /// Delete a stream no subscription aggregates.
    pub async fn delete_stream(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let stream = self.read_stream(id).await?;
        let subscribers = self.graph.subjects_of(id, Predicate::HasStream).await?;
        if !subscribers.is_empty() {
            return Err(ServiceError::bad_request(format!(
                "stream {} is used by {} subscription(s)",
                stream.name,
                subscribers.len()
            )));
        }
        self.remove(id).await?;
        tracing::info!(stream = %stream.name, %id, "stream deleted");
        Ok(())
    }

    pub async fn persist_stream(&self, id: &ResourceId) -> ServiceResult<()> {
        self.set_persisted(id, true).await
    }

    pub async fn unpersist_stream(&self, id: &ResourceId) -> ServiceResult<()> {
        self.set_persisted(id, false).await
    }

    pub async fn is_persisted(&self, id: &ResourceId) -> ServiceResult<bool> {
        Ok(self.read_stream(id).await?.persisted)
    }

    /// Streams tagged with `topic`.
    pub async fn find_streams_by_topic(&self, topic: &ResourceId) -> ServiceResult<Vec<ResourceId>> {
        let _: Topic = self.read_as(topic).await?;
        Ok(self.graph.subjects_of(topic, Predicate::TaggedWith).await?)
    }

    async fn set_persisted(&self, id: &ResourceId, persisted: bool) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let mut stream = self.read_stream(id).await?;
        if stream.persisted == persisted {
            let state = if persisted { "persisted" } else { "not persisted" };
            return Err(ServiceError::bad_request(format!(
                "stream {} is already {state}",
                stream.name
            )));
        }
        stream.persisted = persisted;
        let name = stream.name.clone();
        self.catalog.update(stream.into()).await?;
        tracing::info!(stream = %name, %id, persisted, "stream persistence changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::routing::MAX_TOKEN_CHARS;

    #[tokio::test]
    async fn routing_key_uses_only_topics_on_the_same_exchange_point() {
        let h = harness();
        let ocean = h
            .service
            .create_topic(topic("Ocean", "science", None))
            .await
            .expect("ocean");
        let other = h
            .service
            .create_topic(topic("Other", "elsewhere", None))
            .await
            .expect("other");
        let (id, route) = h
            .service
            .create_stream(stream("CTD Data", "science", &[ocean, other, ocean]))
            .await
            .expect("stream");
        assert_eq!(route.routing_key, "ctddata.ocean.stream");
        assert_eq!(route.exchange_point, "science");
        assert_eq!(h.service.read_stream_route(&id).await.expect("route"), route);
        assert_eq!(
            h.service.find_streams_by_topic(&ocean).await.expect("ocean"),
            vec![id]
        );
        assert!(
            h.service
                .find_streams_by_topic(&other)
                .await
                .expect("other")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn duplicate_stream_name_conflicts() {
        let h = harness();
        h.service
            .create_stream(stream("ctd", "xp", &[]))
            .await
            .expect("first");
        let err = h
            .service
            .create_stream(stream("ctd", "xp", &[]))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_exchange_point_is_rejected() {
        let h = harness();
        let err = h
            .service
            .create_stream(stream("ctd", "", &[]))
            .await
            .expect_err("no exchange point");
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn overlong_routing_key_persists_nothing() {
        let h = harness();
        let mut topics = Vec::new();
        for i in 0..9 {
            let name = format!("{i}{}", "t".repeat(MAX_TOKEN_CHARS));
            topics.push(
                h.service
                    .create_topic(topic(&name, "xp", None))
                    .await
                    .expect("topic"),
            );
        }
        let name = "s".repeat(MAX_TOKEN_CHARS);
        let err = h
            .service
            .create_stream(stream(&name, "xp", &topics))
            .await
            .expect_err("too long");
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert!(
            h.service
                .catalog()
                .find_resources_by_name(ResourceKind::Stream, &name)
                .await
                .expect("lookup")
                .is_empty()
        );
        assert!(
            h.service
                .find_streams_by_topic(&topics[0])
                .await
                .expect("edges")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unknown_definition_fails_before_persisting() {
        let h = harness();
        let mut request = stream("ctd", "xp", &[]);
        request.stream_definition_id = Some(ResourceId::new());
        let err = h.service.create_stream(request).await.expect_err("missing");
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(
            h.service
                .catalog()
                .find_resources_by_name(ResourceKind::Stream, "ctd")
                .await
                .expect("lookup")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn persist_toggles_once_per_state() {
        let h = harness();
        let (id, _) = h
            .service
            .create_stream(stream("ctd", "xp", &[]))
            .await
            .expect("stream");
        assert!(!h.service.is_persisted(&id).await.expect("state"));
        assert!(matches!(
            h.service.unpersist_stream(&id).await,
            Err(ServiceError::BadRequest(_))
        ));
        h.service.persist_stream(&id).await.expect("persist");
        assert!(h.service.is_persisted(&id).await.expect("state"));
        assert!(matches!(
            h.service.persist_stream(&id).await,
            Err(ServiceError::BadRequest(_))
        ));
        h.service.unpersist_stream(&id).await.expect("unpersist");
        assert!(!h.service.is_persisted(&id).await.expect("state"));
    }

    #[tokio::test]
    async fn stream_with_subscribers_cannot_be_deleted() {
        let h = harness();
        let root = h
            .service
            .create_topic(topic("root", "xp", None))
            .await
            .expect("topic");
        let (id, _) = h
            .service
            .create_stream(stream("ctd", "xp", &[root]))
            .await
            .expect("stream");
        let mut request = subscription("sub");
        request.stream_ids = vec![id];
        let sub = h
            .service
            .create_subscription(request)
            .await
            .expect("subscription");

        let err = h.service.delete_stream(&id).await.expect_err("referenced");
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert!(h.service.read_stream(&id).await.is_ok());

        h.service.delete_subscription(&sub).await.expect("delete sub");
        h.service.delete_stream(&id).await.expect("delete stream");
        assert!(matches!(
            h.service.read_stream(&id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(
            h.service
                .find_streams_by_topic(&root)
                .await
                .expect("edges")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn empty_name_gets_a_generated_one() {
        let h = harness();
        let (id, route) = h
            .service
            .create_stream(stream("", "xp", &[]))
            .await
            .expect("stream");
        let read = h.service.read_stream(&id).await.expect("read");
        assert!(!read.name.is_empty());
        assert!(route.routing_key.ends_with(".stream"));
    }
}
