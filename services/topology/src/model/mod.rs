//! Topology data model.
//!
//! # Purpose
//! Re-exports the resource records (stream definitions, streams, topics,
//! subscriptions), the tagged `Resource` union returned by catalog reads, and
//! the typed association edges connecting them.
mod association;
mod resource;
mod stream;
mod stream_definition;
mod subscription;
mod topic;

pub use association::{Association, Predicate};
pub use resource::{Resource, ResourceChange, ResourceChangeOp, ResourceKind, ResourceVariant};
pub use stream::{Stream, StreamRoute};
pub use stream_definition::StreamDefinition;
pub use subscription::{Subscription, SubscriptionState};
pub use topic::Topic;
pub use switchyard_common::ids::{AssociationId, ResourceId};
