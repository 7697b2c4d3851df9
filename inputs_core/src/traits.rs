//! Collaborator traits consumed by the inputs orchestrator.
//!
//! Each trait is a seam to an external system. The orchestrator awaits every
//! call in sequence; implementations must not retry internally.

use crate::types::{ConfigMap, Credential};
use async_trait::async_trait;
use errors::{BrokerError, ConfigFetchError};

/// External FIFO message source consulted once per initialization.
#[async_trait]
pub trait QueueBroker: Send + Sync {
    /// Pop the first payload from `channel`, waiting as long as it takes.
    async fn blocking_pop(&self, channel: &str) -> Result<ConfigMap, BrokerError>;
}

/// Remote service holding job execution parameters.
#[async_trait]
pub trait ParameterService: Send + Sync {
    /// Fetch the `inputs` object. Any failure is fatal to initialization.
    async fn fetch_parameters(&self, token: Option<&str>) -> Result<ConfigMap, ConfigFetchError>;
}

/// Key/value broker used for the second resolution level.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Resolve `value`, returning it unchanged when it holds no indirection.
    async fn read(&self, value: &str) -> Result<serde_json::Value, BrokerError>;
}

/// Receives authentication tokens as soon as they appear in merged inputs.
///
/// Registering the same token twice must be harmless.
pub trait TokenRegistrar: Send + Sync {
    fn register(&self, context_id: &str, credential: &Credential);
}
