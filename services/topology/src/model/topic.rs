//! Topic model definitions.
//!
//! # Purpose
//! Topics are hierarchical routing tags scoped to an exchange point. Parentage
//! is not stored on the record; it lives in `ParentOf` association edges.
use serde::{Deserialize, Serialize};
use switchyard_common::ids::ResourceId;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Topic {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    pub exchange_point: String,
}
