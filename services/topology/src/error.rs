//! Service error taxonomy.
//!
//! # Purpose
//! Every topology operation fails with one of these categories. Validation
//! failures are raised synchronously and never retried; collaborator failures
//! (catalog, broker) are wrapped unchanged.
use crate::broker::BrokerError;
use crate::model::{ResourceId, ResourceKind};
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Duplicate name with incompatible content.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Missing required field or invalid state transition.
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The stored topology violates an invariant it should hold by construction.
    #[error("integrity error: {0}")]
    Integrity(String),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error(transparent)]
    Store(StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub(crate) fn wrong_kind(id: &ResourceId, expected: ResourceKind, found: ResourceKind) -> Self {
        ServiceError::BadRequest(format!(
            "resource {id} is a {found}, not a {expected}"
        ))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::InvalidAssociation(what) => ServiceError::BadRequest(what),
            other => ServiceError::Store(other),
        }
    }
}
