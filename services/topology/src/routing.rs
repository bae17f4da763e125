//! Routing keys and binding patterns.
//!
//! # Purpose
//! Streams publish with a literal routing key built from their own name and the
//! names of the topics they are tagged with. Subscriptions bind with patterns
//! built from the same sanitized topic tokens, so the two sides only meet if
//! both go through `sanitize`.
use crate::error::{ServiceError, ServiceResult};

/// Longest routing key the broker accepts, in bytes.
pub const MAX_ROUTING_KEY_LEN: usize = 255;
/// Sanitized tokens are capped at this many characters.
pub const MAX_TOKEN_CHARS: usize = 24;
/// Final segment of every stream routing key.
pub const STREAM_SUFFIX: &str = "stream";
/// Binding key used to aggregate a whole exchange point.
pub const EXCHANGE_WILDCARD: &str = "*";

/// Normalize a human name into a routing-key token: lowercase, no whitespace,
/// at most 24 characters.
///
/// ```
/// use topology::routing::sanitize;
///
/// assert_eq!(sanitize("Sea Surface Temperature"), "seasurfacetemperature");
/// assert_eq!(sanitize("A very long topic name that goes on").chars().count(), 24);
/// ```
pub fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(MAX_TOKEN_CHARS)
        .collect()
}

/// Binding pattern selecting every routing key that carries the topic token as
/// a whole segment.
pub fn topic_pattern(topic_name: &str) -> String {
    format!("#.{}.#", sanitize(topic_name))
}

/// Builds a stream routing key: `<stream>.<topic>*.stream`.
#[derive(Debug, Clone)]
pub struct RoutingKeyBuilder {
    segments: Vec<String>,
}

impl RoutingKeyBuilder {
    pub fn new(stream_name: &str) -> Self {
        Self {
            segments: vec![sanitize(stream_name)],
        }
    }

    pub fn topic(mut self, topic_name: &str) -> Self {
        self.segments.push(sanitize(topic_name));
        self
    }

    pub fn topics<'a>(self, topic_names: impl IntoIterator<Item = &'a str>) -> Self {
        topic_names
            .into_iter()
            .fold(self, |builder, name| builder.topic(name))
    }

    pub fn build(mut self) -> ServiceResult<String> {
        self.segments.push(STREAM_SUFFIX.to_string());
        let key = self.segments.join(".");
        if key.len() > MAX_ROUTING_KEY_LEN {
            return Err(ServiceError::bad_request(format!(
                "routing key is {} bytes, the limit is {MAX_ROUTING_KEY_LEN}: too many topics",
                key.len()
            )));
        }
        Ok(key)
    }
}
