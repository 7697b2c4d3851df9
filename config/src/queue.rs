//! # Blocking Queue Loader
//!
//! Pops exactly one payload from the queue broker and types it.
//!
//! The pop has no timeout here: the calling task waits until a payload
//! arrives. Callers that need a bound wrap the whole load themselves.

use crate::coercion::Coercer;
use errors::InputsError;
use inputs_core::{ConfigMap, QueueBroker};

/// Pop one payload from `channel` and coerce it.
pub async fn load_queue_params(
    broker: &dyn QueueBroker,
    channel: &str,
    coercer: &Coercer<'_>,
) -> Result<ConfigMap, InputsError> {
    tracing::info!(%channel, "Waiting for queued params");
    let params = broker
        .blocking_pop(channel)
        .await
        .map_err(InputsError::Queue)?;
    tracing::debug!(count = params.len(), "Received queued params");
    Ok(coercer.coerce_map(params))
}
