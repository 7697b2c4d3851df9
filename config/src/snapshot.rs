//! # Config Snapshots
//!
//! Two distinct views of the inputs:
//! - `ArgsSnapshot`: merged and typed, indirections left as written
//! - `ResolvedSnapshot`: derived from an `ArgsSnapshot` by the resolver,
//!   never holding a key the source snapshot lacks
//!
//! Only the config store mutates an `ArgsSnapshot`, and only the resolver
//! builds a `ResolvedSnapshot`.

use inputs_core::types::keys;
use inputs_core::{ConfigMap, Credential};
use serde::Serialize;
use serde_json::Value;

/// Render a scalar the way the text sources wrote it.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Merged, typed inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArgsSnapshot(ConfigMap);

impl ArgsSnapshot {
    pub(crate) fn from_map(map: ConfigMap) -> Self {
        Self(map)
    }

    pub(crate) fn map_mut(&mut self) -> &mut ConfigMap {
        &mut self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`; `None` when absent, null or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean reading of `key`; absent keys are `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(utils::to_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }

    /// Token carried by the inputs, if any.
    pub fn credential(&self) -> Option<Credential> {
        let value = self.0.get(keys::TOKEN).filter(|v| !v.is_null())?;
        let expires_at = self
            .0
            .get(keys::TOKEN_EXPIRES)
            .filter(|v| !v.is_null())
            .map(value_to_string)
            .unwrap_or_default();
        Some(Credential {
            value: value_to_string(value),
            expires_at,
        })
    }

    /// SHA-256 of the canonical JSON rendering, key order included.
    pub fn fingerprint(&self) -> String {
        utils::compute_content_hash(&Value::Object(self.0.clone()).to_string())
    }
}

/// Inputs with every indirection expanded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSnapshot(ConfigMap);

impl ResolvedSnapshot {
    pub(crate) fn from_map(map: ConfigMap) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }
}
