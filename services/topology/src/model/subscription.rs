//! Subscription model definitions.
//!
//! # Purpose
//! A subscription aggregates streams, topics and whole exchange points into a
//! single named queue (`exchange_name`). Activation materializes the
//! aggregation as broker bindings.
use serde::{Deserialize, Serialize};
use switchyard_common::ids::ResourceId;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Subscription {
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    pub exchange_points: Vec<String>,
    pub exchange_name: String,
    pub credentials: Option<String>,
    pub activated: bool,
}

/// Binding state of a subscription.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionState {
    Inactive,
    Active,
}

impl Subscription {
    pub fn state(&self) -> SubscriptionState {
        if self.activated {
            SubscriptionState::Active
        } else {
            SubscriptionState::Inactive
        }
    }
}
