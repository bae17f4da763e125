//! Stream definition model.
//!
//! # Purpose
//! A stream definition names an opaque schema descriptor (a parameter
//! dictionary). The topology service never interprets the schema; it only
//! compares two descriptors for equality.
use serde::{Deserialize, Serialize};
use switchyard_common::ids::ResourceId;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct StreamDefinition {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub name: String,
    #[schema(value_type = Object)]
    pub schema: serde_json::Value,
    pub stream_type: String,
    pub description: String,
}
