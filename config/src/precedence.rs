//! # Configuration Precedence
//!
//! Merges raw key/value maps from successive sources into one typed
//! snapshot.
//!
//! # Precedence Order
//! 1. Command-line flags (protected once parsed)
//! 2. Remote parameter service
//! 3. Blocking queue payload
//! 4. Previous-run results file
//! 5. Config file and initial inputs (lowest priority)
//!
//! Later sources overwrite earlier ones key by key, except that a merge with
//! `preserve` never touches a key the invocation supplied as `--key`.

use crate::snapshot::{ArgsSnapshot, value_to_string};
use inputs_core::types::keys;
use inputs_core::{ConfigMap, Source, TokenRegistrar};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Mutable key/value store behind an `ArgsSnapshot`.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Owns the merged inputs of one orchestrator, the set of keys protected by
/// the command line, and the token registrar that must see every token as
/// soon as it is merged.
///
/// ## Usage
/// ```rust,no_run
/// use config::{ConfigStore, InMemoryTokenRegistry};
/// use inputs_core::{ConfigMap, Source};
/// use serde_json::json;
/// use std::collections::BTreeSet;
/// use std::sync::Arc;
///
/// let protected = BTreeSet::from(["owner".to_string()]);
/// let mut store = ConfigStore::new(
///     ConfigMap::new(),
///     protected,
///     Arc::new(InMemoryTokenRegistry::default()),
///     "MainThread",
/// );
/// let mut raw = ConfigMap::new();
/// raw.insert("owner".to_string(), json!("Beta"));
/// store.merge(raw, Source::RemoteService, true);
/// assert!(store.snapshot().get("owner").is_none());
/// ```
pub struct ConfigStore {
    snapshot: ArgsSnapshot,
    protected: BTreeSet<String>,
    registrar: Arc<dyn TokenRegistrar>,
    context_id: String,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("keys", &self.snapshot.len())
            .field("protected", &self.protected)
            .field("context_id", &self.context_id)
            .finish()
    }
}

impl ConfigStore {
    pub fn new(
        base: ConfigMap,
        protected: BTreeSet<String>,
        registrar: Arc<dyn TokenRegistrar>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            snapshot: ArgsSnapshot::from_map(base),
            protected,
            registrar,
            context_id: context_id.into(),
        }
    }

    pub fn snapshot(&self) -> &ArgsSnapshot {
        &self.snapshot
    }

    pub fn protected_keys(&self) -> &BTreeSet<String> {
        &self.protected
    }

    /// Merge `raw` into the snapshot and return the keys whose value changed.
    ///
    /// With `preserve`, keys supplied on the command line are dropped from
    /// `raw` first. The token registrar runs after every merge.
    pub fn merge(&mut self, raw: ConfigMap, source: Source, preserve: bool) -> Vec<String> {
        let mut changes = Vec::new();
        let mut changed_keys = Vec::new();

        for (key, value) in raw {
            if preserve && self.protected.contains(&key) {
                tracing::debug!(%key, %source, "Keeping command line value");
                continue;
            }
            let map = self.snapshot.map_mut();
            if map.get(&key) == Some(&value) {
                continue;
            }
            changes.push(describe_change(&key, &value));
            changed_keys.push(key.clone());
            map.insert(key, value);
        }

        if !changes.is_empty() {
            tracing::info!("Configuration from {}: {:?}", source, changes);
        }

        self.register_token();
        changed_keys
    }

    /// Set `key` only when the snapshot has no non-null value for it.
    pub(crate) fn set_if_unset(&mut self, key: &str, value: Value) {
        let map = self.snapshot.map_mut();
        if map.get(key).is_none_or(Value::is_null) {
            map.insert(key.to_string(), value);
        }
    }

    /// Forward the current token, if any, to the registrar.
    pub fn register_token(&self) {
        if let Some(credential) = self.snapshot.credential() {
            tracing::debug!(context_id = %self.context_id, "Registering token");
            self.registrar.register(&self.context_id, &credential);
        }
    }

    pub fn into_snapshot(self) -> ArgsSnapshot {
        self.snapshot
    }
}

fn describe_change(key: &str, value: &Value) -> String {
    if keys::SECRETS.contains(&key) {
        format!("{key} = ***")
    } else {
        format!("{key} = {}", value_to_string(value))
    }
}
