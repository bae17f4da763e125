//! OpenAPI schema aggregation for the topology API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    resources, stream_definitions, streams, subscriptions, system, topics,
    types::{
        ActiveResponse, CompareResponse, CreatedResponse, ErrorResponse, HealthStatus,
        IdListResponse, PersistedResponse, ResourceChangesResponse, ResourceSnapshotResponse,
        StreamCreateRequest, StreamCreatedResponse, StreamDefinitionCreateRequest,
        SubscriptionCreateRequest, SystemInfo, TopicCreateRequest,
    },
};
use crate::model::{
    ResourceChange, ResourceChangeOp, ResourceKind, Stream, StreamDefinition, StreamRoute,
    Subscription, SubscriptionState, Topic,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "switchyard-topology",
        version = "v1",
        description = "Switchyard pub/sub topology HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        stream_definitions::create_stream_definition,
        stream_definitions::get_stream_definition,
        stream_definitions::delete_stream_definition,
        stream_definitions::compare_stream_definitions,
        stream_definitions::list_definition_streams,
        streams::create_stream,
        streams::get_stream,
        streams::delete_stream,
        streams::get_stream_route,
        streams::get_persisted,
        streams::persist_stream,
        streams::unpersist_stream,
        topics::create_topic,
        topics::find_topics,
        topics::get_topic,
        topics::delete_topic,
        topics::list_child_topics,
        topics::list_topic_streams,
        subscriptions::create_subscription,
        subscriptions::get_subscription,
        subscriptions::delete_subscription,
        subscriptions::get_active,
        subscriptions::activate_subscription,
        subscriptions::deactivate_subscription,
        resources::resource_snapshot,
        resources::resource_changes
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        CreatedResponse,
        IdListResponse,
        CompareResponse,
        PersistedResponse,
        ActiveResponse,
        StreamDefinition,
        StreamDefinitionCreateRequest,
        Stream,
        StreamRoute,
        StreamCreateRequest,
        StreamCreatedResponse,
        Topic,
        TopicCreateRequest,
        Subscription,
        SubscriptionState,
        SubscriptionCreateRequest,
        ResourceKind,
        ResourceChange,
        ResourceChangeOp,
        ResourceSnapshotResponse,
        ResourceChangesResponse
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "stream-definitions", description = "Stream definition management"),
        (name = "streams", description = "Stream management"),
        (name = "topics", description = "Topic hierarchy management"),
        (name = "subscriptions", description = "Subscriptions and broker bindings"),
        (name = "resources", description = "Catalog snapshot and change feed")
    )
)]
pub struct ApiDoc;
