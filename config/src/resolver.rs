//! # Variable Resolver
//!
//! Expands indirections in an `ArgsSnapshot` into a `ResolvedSnapshot`.
//!
//! Two levels, applied in order and never mixed:
//! 1. Environment: `$env.KEY` / `$envs.KEY` becomes the value of `KEY` when
//!    set, else stays literal. Applies to every string value.
//! 2. Key/value broker: every string value of a key outside the no-resolve
//!    set is passed through `KeyValueStore::read`.
//!
//! Resolution never adds keys and is idempotent on indirection-free values.

use crate::snapshot::{ArgsSnapshot, ResolvedSnapshot};
use errors::InputsError;
use inputs_core::{ConfigMap, KeyValueStore, ReservedKeys};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$envs?\.(.+)$").expect("static env pattern"));

/// Level 1 for a single string: the referenced environment value, if any.
pub fn resolve_env(value: &str) -> Option<String> {
    let key = ENV_REFERENCE.captures(value)?.get(1)?.as_str();
    std::env::var(key).ok()
}

/// Level 1 for a single value; non-strings pass through.
pub fn resolve_env_value(value: Value) -> Value {
    match value {
        Value::String(s) => match resolve_env(&s) {
            Some(resolved) => Value::String(resolved),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Run both levels over `args`.
///
/// Without a `store`, Level 2 is skipped and only environment references are
/// expanded.
pub async fn resolve_snapshot(
    args: &ArgsSnapshot,
    reserved: &ReservedKeys,
    store: Option<&dyn KeyValueStore>,
) -> Result<ResolvedSnapshot, InputsError> {
    let mut resolved = ConfigMap::new();

    for (key, value) in args.iter() {
        let value = resolve_env_value(value.clone());
        let value = match (store, value) {
            (Some(store), Value::String(s)) if !reserved.is_no_resolve(key) => {
                store
                    .read(&s)
                    .await
                    .map_err(|source| InputsError::Resolution {
                        key: key.clone(),
                        source,
                    })?
            }
            (_, value) => value,
        };
        resolved.insert(key.clone(), value);
    }

    tracing::debug!(keys = resolved.len(), "Resolved inputs");
    Ok(ResolvedSnapshot::from_map(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use errors::BrokerError;
    use serde_json::json;
    use serial_test::serial;
    use std::collections::HashMap;

    fn args(value: Value) -> ArgsSnapshot {
        match value {
            Value::Object(map) => ArgsSnapshot::from_map(map),
            _ => panic!("object expected"),
        }
    }

    struct MapStore(HashMap<String, Value>);

    #[async_trait]
    impl KeyValueStore for MapStore {
        async fn read(&self, value: &str) -> Result<Value, BrokerError> {
            Ok(self
                .0
                .get(value)
                .cloned()
                .unwrap_or_else(|| Value::String(value.to_string())))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn read(&self, _value: &str) -> Result<Value, BrokerError> {
            Err(BrokerError::Query {
                backend: "Redis".to_string(),
                reason: "down".to_string(),
            })
        }
    }

    #[test]
    #[serial]
    fn test_resolve_env_set_and_unset() {
        unsafe {
            std::env::set_var("INPUTS_TEST_API_KEY", "xyz");
            std::env::remove_var("INPUTS_TEST_UNSET");
        }

        assert_eq!(resolve_env("$env.INPUTS_TEST_API_KEY").as_deref(), Some("xyz"));
        assert_eq!(resolve_env("$envs.INPUTS_TEST_API_KEY").as_deref(), Some("xyz"));
        assert_eq!(resolve_env("$env.INPUTS_TEST_UNSET"), None);
        assert_eq!(
            resolve_env_value(json!("$env.INPUTS_TEST_UNSET")),
            json!("$env.INPUTS_TEST_UNSET")
        );
        assert_eq!(resolve_env("prefix $env.INPUTS_TEST_API_KEY"), None);
        assert_eq!(resolve_env("$env."), None);

        unsafe {
            std::env::remove_var("INPUTS_TEST_API_KEY");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_resolve_snapshot_both_levels() {
        unsafe {
            std::env::set_var("INPUTS_TEST_SECRET", "s3cr3t");
        }
        let store = MapStore(HashMap::from([
            ("#App:1:owner!String".to_string(), json!("Acme")),
            ("#App:1:tc_log_path!String".to_string(), json!("never")),
        ]));
        let snapshot = args(json!({
            "owner": "#App:1:owner!String",
            "tc_log_path": "#App:1:tc_log_path!String",
            "api_secret_key": "$envs.INPUTS_TEST_SECRET",
            "flag": true,
            "tags": ["a", "b"],
        }));

        let resolved = resolve_snapshot(&snapshot, &ReservedKeys::default(), Some(&store))
            .await
            .unwrap();
        assert_eq!(resolved.get_str("owner"), Some("Acme"));
        assert_eq!(resolved.get_str("tc_log_path"), Some("#App:1:tc_log_path!String"));
        assert_eq!(resolved.get_str("api_secret_key"), Some("s3cr3t"));
        assert_eq!(resolved.get("flag"), Some(&json!(true)));
        assert_eq!(resolved.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(resolved.len(), snapshot.len());

        unsafe {
            std::env::remove_var("INPUTS_TEST_SECRET");
        }
    }

    #[tokio::test]
    async fn test_resolve_snapshot_is_idempotent() {
        let store = MapStore(HashMap::new());
        let snapshot = args(json!({"owner": "Acme", "count": 3}));

        let first = resolve_snapshot(&snapshot, &ReservedKeys::default(), Some(&store))
            .await
            .unwrap();
        let again = args(Value::Object(first.as_map().clone()));
        let second = resolve_snapshot(&again, &ReservedKeys::default(), Some(&store))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_map(), snapshot.as_map());
    }

    #[tokio::test]
    async fn test_resolve_snapshot_without_store_skips_level_two() {
        let snapshot = args(json!({"owner": "#App:1:owner!String"}));
        let resolved = resolve_snapshot(&snapshot, &ReservedKeys::default(), None)
            .await
            .unwrap();
        assert_eq!(resolved.get_str("owner"), Some("#App:1:owner!String"));
    }

    #[tokio::test]
    async fn test_resolve_snapshot_store_failure() {
        let snapshot = args(json!({"tc_token": "abc", "owner": "x"}));
        let err = resolve_snapshot(&snapshot, &ReservedKeys::default(), Some(&FailingStore))
            .await
            .unwrap_err();
        match err {
            InputsError::Resolution { key, .. } => assert_eq!(key, "owner"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
