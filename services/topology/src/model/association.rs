//! Typed association edges.
//!
//! # Purpose
//! Every edge in the topology graph carries a predicate naming exactly one
//! relationship. Each predicate fixes the kinds of its subject and object, so
//! topic parentage (`ParentOf`) can never be confused with a stream or
//! subscription pointing at a topic.
use super::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use switchyard_common::ids::{AssociationId, ResourceId};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// Topic -> child Topic.
    ParentOf,
    /// Stream -> Topic it publishes under.
    TaggedWith,
    /// Subscription -> Topic whose subtree it aggregates.
    AggregatesTopic,
    /// Subscription -> Stream it aggregates.
    HasStream,
    /// Stream -> its StreamDefinition.
    HasStreamDefinition,
}

impl Predicate {
    pub fn subject_kind(&self) -> ResourceKind {
        match self {
            Predicate::ParentOf => ResourceKind::Topic,
            Predicate::TaggedWith | Predicate::HasStreamDefinition => ResourceKind::Stream,
            Predicate::AggregatesTopic | Predicate::HasStream => ResourceKind::Subscription,
        }
    }

    pub fn object_kind(&self) -> ResourceKind {
        match self {
            Predicate::ParentOf | Predicate::TaggedWith | Predicate::AggregatesTopic => {
                ResourceKind::Topic
            }
            Predicate::HasStream => ResourceKind::Stream,
            Predicate::HasStreamDefinition => ResourceKind::StreamDefinition,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::ParentOf => "parentOf",
            Predicate::TaggedWith => "taggedWith",
            Predicate::AggregatesTopic => "aggregatesTopic",
            Predicate::HasStream => "hasStream",
            Predicate::HasStreamDefinition => "hasStreamDefinition",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Association {
    #[schema(value_type = String, format = Uuid)]
    pub id: AssociationId,
    #[schema(value_type = String, format = Uuid)]
    pub subject: ResourceId,
    pub predicate: Predicate,
    #[schema(value_type = String, format = Uuid)]
    pub object: ResourceId,
}
