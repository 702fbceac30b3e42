use async_trait::async_trait;
use serde_json::Value as Json;
use thiserror::Error;

use crate::{Cardinality, SubResource};

/// Failure reported by a [`ConfigSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The provider answered with a coded error.
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    /// Anything without a provider error code: transport, credentials, timeouts.
    #[error("{0}")]
    Other(String),
    #[error("{kind} is not a {expected} sub-resource")]
    WrongCardinality { kind: SubResource, expected: Cardinality },
}

impl SourceError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Service { code: code.into(), message: message.into() }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            SourceError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the error is the provider's way of saying `kind` is simply not
    /// configured on the bucket.
    pub fn is_absence_of(&self, kind: SubResource) -> bool {
        let Some(marker) = kind.absence_marker() else { return false };
        match self {
            SourceError::Service { code, .. } => code == marker,
            // Some S3-compatible endpoints drop the code; fall back to the text.
            SourceError::Other(message) => message.contains(marker),
            SourceError::WrongCardinality { .. } => false,
        }
    }
}

/// Read-only view of an account's bucket configuration.
///
/// `get` serves single-valued sub-resources; `list_ids` and `get_by_id` serve
/// multi-valued ones. Every call returns the provider response as a JSON
/// snapshot.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, SourceError>;
    async fn get(&self, bucket: &str, kind: SubResource) -> Result<Json, SourceError>;
    async fn list_ids(&self, bucket: &str, kind: SubResource) -> Result<Vec<String>, SourceError>;
    async fn get_by_id(&self, bucket: &str, kind: SubResource, id: &str) -> Result<Json, SourceError>;
}
