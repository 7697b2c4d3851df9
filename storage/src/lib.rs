//! # Storage
//!
//! Redis implementations of the external brokers used by the inputs engine:
//! - `RedisQueueBroker`: blocking pop of the queued parameter payload
//! - `RedisKeyValueStore`: variable lookup for the second resolution level

pub mod redis;

pub use self::redis::{RedisKeyValueStore, RedisQueueBroker, RedisStorage, decode_payload};
