//! Topology HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared path-parameter parsing used by
//! every `/{id}` endpoint.
pub mod error;
pub mod openapi;
pub mod resources;
pub mod stream_definitions;
pub mod streams;
pub mod subscriptions;
pub mod system;
pub mod topics;
pub mod types;

use crate::api::error::{ApiError, api_validation_error};
use crate::model::ResourceId;
use std::str::FromStr;

/// Parse a resource id path segment, answering 400 with the standard error
/// body on malformed input.
pub(crate) fn parse_id(raw: &str) -> Result<ResourceId, ApiError> {
    ResourceId::from_str(raw)
        .map_err(|_| api_validation_error(&format!("invalid resource id: {raw}")))
}
