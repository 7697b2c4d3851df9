use async_trait::async_trait;
use errors::BrokerError;
use inputs_core::{
    ConfigMap, KeyValueStore, QueueBroker, VariableToken, find_variables, substitute_variables,
};
use redis::AsyncCommands;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const BACKEND: &str = "Redis";

fn connection_error(e: redis::RedisError) -> BrokerError {
    BrokerError::Connection {
        backend: BACKEND.to_string(),
        reason: e.to_string(),
    }
}

fn query_error(e: redis::RedisError) -> BrokerError {
    BrokerError::Query {
        backend: BACKEND.to_string(),
        reason: e.to_string(),
    }
}

/// Shared Redis client plus a managed connection for short commands.
#[derive(Clone)]
pub struct RedisStorage {
    client: Arc<redis::Client>,
    connection_manager: redis::aio::ConnectionManager,
}

impl RedisStorage {
    pub async fn new(connection_string: &str) -> Result<Self, BrokerError> {
        let client = redis::Client::open(connection_string).map_err(connection_error)?;
        let connection_manager = client
            .get_connection_manager()
            .await
            .map_err(connection_error)?;

        Ok(Self {
            client: Arc::new(client),
            connection_manager,
        })
    }

    /// Raw value stored under `field` of the `context` hash.
    pub async fn hget(&self, context: &str, field: &str) -> Result<Option<String>, BrokerError> {
        let mut conn = self.connection_manager.clone();
        conn.hget(context, field).await.map_err(query_error)
    }

    /// Store `value` JSON-encoded under `field` of the `context` hash.
    pub async fn hset(&self, context: &str, field: &str, value: &Value) -> Result<(), BrokerError> {
        let mut conn = self.connection_manager.clone();
        conn.hset::<_, _, _, ()>(context, field, value.to_string())
            .await
            .map_err(query_error)
    }

    /// Append a JSON payload to the tail of `channel`.
    pub async fn push(&self, channel: &str, payload: &Value) -> Result<(), BrokerError> {
        let mut conn = self.connection_manager.clone();
        conn.rpush::<_, _, ()>(channel, payload.to_string())
            .await
            .map_err(query_error)
    }

    /// Queue broker over this client. A zero timeout waits forever.
    pub fn queue_broker(&self, timeout_seconds: f64) -> RedisQueueBroker {
        RedisQueueBroker {
            client: Arc::clone(&self.client),
            timeout_seconds,
        }
    }

    /// Key/value broker reading variables from the `context` hash.
    pub fn key_value_store(&self, context: &str) -> RedisKeyValueStore {
        RedisKeyValueStore {
            storage: self.clone(),
            context: context.to_string(),
        }
    }
}

/// Decode a queued payload into parameters.
///
/// The payload is a JSON object. Its `params` member is returned when
/// present, otherwise the whole object.
pub fn decode_payload(channel: &str, raw: &str) -> Result<ConfigMap, BrokerError> {
    let decode_error = |reason: String| BrokerError::Decode {
        channel: channel.to_string(),
        reason,
    };
    match serde_json::from_str::<Value>(raw).map_err(|e| decode_error(e.to_string()))? {
        Value::Object(mut payload) => match payload.remove("params") {
            Some(Value::Object(params)) => Ok(params),
            Some(_) => Err(decode_error("params is not an object".to_string())),
            None => Ok(payload),
        },
        _ => Err(decode_error("payload is not an object".to_string())),
    }
}

/// `QueueBroker` popping from a Redis list with BLPOP.
pub struct RedisQueueBroker {
    client: Arc<redis::Client>,
    timeout_seconds: f64,
}

impl RedisQueueBroker {
    pub async fn new(connection_string: &str, timeout_seconds: f64) -> Result<Self, BrokerError> {
        let client = redis::Client::open(connection_string).map_err(connection_error)?;
        Ok(Self {
            client: Arc::new(client),
            timeout_seconds,
        })
    }
}

#[async_trait]
impl QueueBroker for RedisQueueBroker {
    async fn blocking_pop(&self, channel: &str) -> Result<ConfigMap, BrokerError> {
        // BLPOP may outlive any client-side response timeout
        let config = redis::AsyncConnectionConfig::new().set_response_timeout(None);
        let mut conn = self
            .client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(connection_error)?;

        tracing::debug!(%channel, timeout = self.timeout_seconds, "BLPOP");
        let popped: Option<(String, String)> = redis::cmd("BLPOP")
            .arg(channel)
            .arg(self.timeout_seconds)
            .query_async(&mut conn)
            .await
            .map_err(query_error)?;

        match popped {
            Some((_, raw)) => decode_payload(channel, &raw),
            None => Err(BrokerError::Timeout {
                channel: channel.to_string(),
                timeout_seconds: self.timeout_seconds,
            }),
        }
    }
}

/// Decode a stored variable value; anything that is not JSON stays a string.
fn decode_stored(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

/// Render a stored value for embedding in a longer string.
fn embed(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `KeyValueStore` resolving variables against one Redis context hash.
///
/// - A value that is exactly one variable becomes the stored value (null
///   when nothing is stored).
/// - Variables embedded in a longer string are replaced with their stored
///   values; missing ones are left as written.
/// - Any other string is returned unchanged.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    storage: RedisStorage,
    context: String,
}

impl RedisKeyValueStore {
    pub async fn new(connection_string: &str, context: &str) -> Result<Self, BrokerError> {
        Ok(RedisStorage::new(connection_string)
            .await?
            .key_value_store(context))
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    async fn lookup(&self, token: &VariableToken) -> Result<Option<Value>, BrokerError> {
        let raw = self.storage.hget(&self.context, &token.to_string()).await?;
        Ok(raw.map(decode_stored))
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn read(&self, value: &str) -> Result<Value, BrokerError> {
        if let Some(token) = VariableToken::parse(value) {
            return Ok(self.lookup(&token).await?.unwrap_or(Value::Null));
        }

        let tokens = find_variables(value);
        if tokens.is_empty() {
            return Ok(Value::String(value.to_string()));
        }

        let mut found = HashMap::new();
        for token in tokens {
            if let Some(stored) = self.lookup(&token).await? {
                found.insert(token.to_string(), embed(&stored));
            }
        }
        Ok(Value::String(substitute_variables(value, |token| {
            found.get(&token.to_string()).cloned()
        })))
    }
}
