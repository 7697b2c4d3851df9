//! # Inputs Engine Utilities
//!
//! Small helpers shared by the engine crates: boolean coercion of loosely
//! typed values and content hashing.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Interpret a loosely typed value as a boolean.
///
/// Strings match `"true"` case-insensitively; any other string is `false`.
/// Numbers are `true` when non-zero. `null`, arrays and objects are `false`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use utils::to_bool;
///
/// assert!(to_bool(&json!("TRUE")));
/// assert!(!to_bool(&json!("no")));
/// assert!(to_bool(&json!(true)));
/// ```
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Compute SHA-256 hash of content string as lowercase hex.
///
/// # Examples
///
/// ```
/// use utils::compute_content_hash;
///
/// let hash = compute_content_hash("hello world");
/// assert_eq!(hash.len(), 64);
/// ```
#[must_use]
pub fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_bool_strings() {
        assert!(to_bool(&json!("true")));
        assert!(to_bool(&json!("True")));
        assert!(to_bool(&json!(" true ")));
        assert!(!to_bool(&json!("false")));
        assert!(!to_bool(&json!("no")));
        assert!(!to_bool(&json!("")));
    }

    #[test]
    fn test_to_bool_non_strings() {
        assert!(to_bool(&json!(true)));
        assert!(!to_bool(&json!(false)));
        assert!(to_bool(&json!(1)));
        assert!(!to_bool(&json!(0)));
        assert!(!to_bool(&Value::Null));
        assert!(!to_bool(&json!(["true"])));
    }

    #[test]
    fn test_compute_content_hash_consistency() {
        let content = "test content";
        let hash1 = compute_content_hash(content);
        let hash2 = compute_content_hash(content);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, compute_content_hash("other content"));
    }
}
