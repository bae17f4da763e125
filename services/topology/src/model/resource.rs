//! Tagged resource union and catalog change-log payloads.
//!
//! # Purpose
//! Catalog reads return a `Resource`, one variant per entity kind. Callers
//! narrow it to a concrete record with `ResourceVariant::from_resource`, a
//! pattern match rather than a runtime type check.
use super::{Stream, StreamDefinition, Subscription, Topic};
use serde::{Deserialize, Serialize};
use std::fmt;
use switchyard_common::ids::ResourceId;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    StreamDefinition,
    Stream,
    Topic,
    Subscription,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::StreamDefinition => "stream_definition",
            ResourceKind::Stream => "stream",
            ResourceKind::Topic => "topic",
            ResourceKind::Subscription => "subscription",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    StreamDefinition(StreamDefinition),
    Stream(Stream),
    Topic(Topic),
    Subscription(Subscription),
}

impl Resource {
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::StreamDefinition(item) => item.id,
            Resource::Stream(item) => item.id,
            Resource::Topic(item) => item.id,
            Resource::Subscription(item) => item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::StreamDefinition(item) => &item.name,
            Resource::Stream(item) => &item.name,
            Resource::Topic(item) => &item.name,
            Resource::Subscription(item) => &item.name,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::StreamDefinition(_) => ResourceKind::StreamDefinition,
            Resource::Stream(_) => ResourceKind::Stream,
            Resource::Topic(_) => ResourceKind::Topic,
            Resource::Subscription(_) => ResourceKind::Subscription,
        }
    }
}

/// A concrete record that can be wrapped into, and narrowed out of, `Resource`.
pub trait ResourceVariant: Sized {
    const KIND: ResourceKind;

    /// Narrow a resource to this variant, handing the resource back on mismatch.
    fn from_resource(resource: Resource) -> Result<Self, Resource>;

    fn into_resource(self) -> Resource;
}

macro_rules! resource_variant {
    ($ty:ident) => {
        impl ResourceVariant for $ty {
            const KIND: ResourceKind = ResourceKind::$ty;

            fn from_resource(resource: Resource) -> Result<Self, Resource> {
                match resource {
                    Resource::$ty(item) => Ok(item),
                    other => Err(other),
                }
            }

            fn into_resource(self) -> Resource {
                Resource::$ty(self)
            }
        }

        impl From<$ty> for Resource {
            fn from(item: $ty) -> Self {
                Resource::$ty(item)
            }
        }
    };
}

resource_variant!(StreamDefinition);
resource_variant!(Stream);
resource_variant!(Topic);
resource_variant!(Subscription);

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ResourceChange {
    pub seq: u64,
    pub op: ResourceChangeOp,
    #[schema(value_type = String, format = Uuid)]
    pub id: ResourceId,
    pub kind: ResourceKind,
    #[schema(value_type = Object, nullable)]
    pub resource: Option<Resource>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResourceChangeOp {
    Created,
    Updated,
    Deleted,
}

impl ResourceChangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceChangeOp::Created => "created",
            ResourceChangeOp::Updated => "updated",
            ResourceChangeOp::Deleted => "deleted",
        }
    }
}
