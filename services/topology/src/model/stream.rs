//! Stream model definitions.
//!
//! # Purpose
//! A stream is a named data producer. Its route tells the broker where its
//! messages are published: an exchange point and a routing key derived from the
//! stream name and the topics it is tagged with.
use serde::{Deserialize, Serialize};
use switchyard_common::ids::ResourceId;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct StreamRoute {
    pub exchange_point: String,
    pub routing_key: String,
    pub credentials: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Stream {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    pub persisted: bool,
    pub route: StreamRoute,
}
