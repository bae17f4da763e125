//! Subscription lifecycle and activation.
//!
//! A subscription is `Inactive` when created. `activate` binds everything it
//! aggregates and flips it to `Active`; `deactivate` unbinds the same plan and
//! flips it back. The flag is only written after every broker call succeeded.
use super::{TopologyService, dedup_ids, name_or_generated, read_many_as};
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Predicate, ResourceId, ResourceKind, Stream, Subscription, Topic};

#[derive(Debug, Clone, Default)]
pub struct NewSubscription {
    pub name: String,
    pub stream_ids: Vec<ResourceId>,
    pub exchange_points: Vec<String>,
    pub topic_ids: Vec<ResourceId>,
    /// Queue name. Defaults to `name`.
    pub exchange_name: String,
    pub credentials: Option<String>,
    pub description: String,
}

impl TopologyService {
    pub async fn create_subscription(&self, request: NewSubscription) -> ServiceResult<ResourceId> {
        let _guard = self
            .lock_name(ResourceKind::Subscription, &request.name)
            .await;
        if !self
            .named(ResourceKind::Subscription, &request.name)
            .await?
            .is_empty()
        {
            return Err(ServiceError::conflict(format!(
                "subscription {} already exists",
                request.name
            )));
        }
        let exchange_name = if request.exchange_name.is_empty() {
            request.name.clone()
        } else {
            request.exchange_name
        };
        if exchange_name.is_empty() {
            return Err(ServiceError::bad_request(
                "subscription needs a name or an exchange name",
            ));
        }

        if request.exchange_points.iter().any(String::is_empty) {
            return Err(ServiceError::bad_request(
                "subscription exchange points must not be empty",
            ));
        }
        let mut exchange_points: Vec<String> = Vec::new();
        for exchange_point in request.exchange_points {
            if !exchange_points.contains(&exchange_point) {
                exchange_points.push(exchange_point);
            }
        }

        // Validate every endpoint before anything is written, and keep them
        // locked until the edges exist.
        let stream_ids = dedup_ids(&request.stream_ids);
        let topic_ids = dedup_ids(&request.topic_ids);
        let referenced: Vec<ResourceId> = stream_ids.iter().chain(&topic_ids).copied().collect();
        let _referenced_guards = self.lock_entities(&referenced).await;
        let _: Vec<Stream> = read_many_as(self.catalog.as_ref(), &stream_ids).await?;
        let _: Vec<Topic> = read_many_as(self.catalog.as_ref(), &topic_ids).await?;

        let subscription = Subscription {
            id: ResourceId::new(),
            name: name_or_generated(request.name),
            description: request.description,
            exchange_points,
            exchange_name,
            credentials: request.credentials,
            activated: false,
        };
        let id = self.catalog.create(subscription.clone().into()).await?;
        for stream in &stream_ids {
            self.graph.link(&id, Predicate::HasStream, stream).await?;
        }
        for topic in &topic_ids {
            self.graph.link(&id, Predicate::AggregatesTopic, topic).await?;
        }
        tracing::info!(
            subscription = %subscription.name,
            %id,
            queue = %subscription.exchange_name,
            streams = stream_ids.len(),
            topics = topic_ids.len(),
            exchange_points = subscription.exchange_points.len(),
            "subscription created"
        );
        Ok(id)
    }

    pub async fn read_subscription(&self, id: &ResourceId) -> ServiceResult<Subscription> {
        self.read_as(id).await
    }

    pub async fn subscription_is_active(&self, id: &ResourceId) -> ServiceResult<bool> {
        Ok(self.read_subscription(id).await?.activated)
    }

    pub async fn delete_subscription(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let subscription = self.read_subscription(id).await?;
        if subscription.activated {
            return Err(ServiceError::bad_request(format!(
                "subscription {} is active; deactivate it first",
                subscription.name
            )));
        }
        self.remove(id).await?;
        tracing::info!(subscription = %subscription.name, %id, "subscription deleted");
        Ok(())
    }

    pub async fn activate_subscription(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let mut subscription = self.read_subscription(id).await?;
        if subscription.activated {
            return Err(ServiceError::bad_request(format!(
                "subscription {} is already active",
                subscription.name
            )));
        }
        let plan = self.bindings.plan(&subscription).await?;
        self.bindings.bind(&plan).await?;
        subscription.activated = true;
        let name = subscription.name.clone();
        self.catalog.update(subscription.into()).await?;
        tracing::info!(subscription = %name, %id, bindings = plan.len(), "subscription activated");
        Ok(())
    }

    pub async fn deactivate_subscription(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let mut subscription = self.read_subscription(id).await?;
        if !subscription.activated {
            return Err(ServiceError::bad_request(format!(
                "subscription {} is not active",
                subscription.name
            )));
        }
        let plan = self.bindings.plan(&subscription).await?;
        self.bindings.unbind(&plan).await?;
        subscription.activated = false;
        let name = subscription.name.clone();
        self.catalog.update(subscription.into()).await?;
        tracing::info!(subscription = %name, %id, bindings = plan.len(), "subscription deactivated");
        Ok(())
    }
}
