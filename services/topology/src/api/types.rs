//! HTTP API request/response types.
//!
//! # Purpose
//! Payload shapes for the topology REST API and OpenAPI schema generation.
//! Create requests convert into the service's `New*` parameter structs.
use crate::model::{Resource, ResourceChange, ResourceId, StreamRoute, SubscriptionState};
use crate::service::{NewStream, NewStreamDefinition, NewSubscription, NewTopic};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub api_version: String,
    pub catalog_backend: String,
    pub catalog_durable: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreatedResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IdListResponse {
    #[schema(value_type = Vec<String>)]
    pub items: Vec<ResourceId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StreamDefinitionCreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub schema: serde_json::Value,
    #[serde(default)]
    pub stream_type: String,
    #[serde(default)]
    pub description: String,
}

impl From<StreamDefinitionCreateRequest> for NewStreamDefinition {
    fn from(body: StreamDefinitionCreateRequest) -> Self {
        NewStreamDefinition {
            name: body.name,
            schema: body.schema,
            stream_type: body.stream_type,
            description: body.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CompareResponse {
    pub equivalent: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StreamCreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exchange_point: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub topic_ids: Vec<ResourceId>,
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub stream_definition_id: Option<ResourceId>,
    #[serde(default)]
    pub description: String,
}

impl From<StreamCreateRequest> for NewStream {
    fn from(body: StreamCreateRequest) -> Self {
        NewStream {
            name: body.name,
            exchange_point: body.exchange_point,
            topic_ids: body.topic_ids,
            credentials: body.credentials,
            stream_definition_id: body.stream_definition_id,
            description: body.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StreamCreatedResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub route: StreamRoute,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PersistedResponse {
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TopicCreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exchange_point: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_topic_id: Option<ResourceId>,
    #[serde(default)]
    pub description: String,
}

impl From<TopicCreateRequest> for NewTopic {
    fn from(body: TopicCreateRequest) -> Self {
        NewTopic {
            name: body.name,
            exchange_point: body.exchange_point,
            parent_topic_id: body.parent_topic_id,
            description: body.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SubscriptionCreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub stream_ids: Vec<ResourceId>,
    #[serde(default)]
    pub exchange_points: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub topic_ids: Vec<ResourceId>,
    #[serde(default)]
    pub exchange_name: String,
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<SubscriptionCreateRequest> for NewSubscription {
    fn from(body: SubscriptionCreateRequest) -> Self {
        NewSubscription {
            name: body.name,
            stream_ids: body.stream_ids,
            exchange_points: body.exchange_points,
            topic_ids: body.topic_ids,
            exchange_name: body.exchange_name,
            credentials: body.credentials,
            description: body.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ActiveResponse {
    pub active: bool,
    pub state: SubscriptionState,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ResourceSnapshotResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Resource>,
    pub next_seq: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ResourceChangesResponse {
    pub items: Vec<ResourceChange>,
    pub next_seq: u64,
}
