//! # Type Coercion
//!
//! Converts raw values into typed values using the parameter schema.
//!
//! Rules, first match wins:
//! 1. MultiChoice or `allowMultiple`: a string is split on the list delimiter
//! 2. Boolean, or a reserved boolean key: `"true"` (any case) is `true`,
//!    every other string is `false`
//! 3. Anything else passes through unchanged
//!
//! Coercion is idempotent: sequences and booleans are left as they are.

use inputs_core::{ConfigMap, ParamType, ParameterSchema, ParameterSpec, ReservedKeys};
use serde_json::Value;

/// Coerce one value.
pub fn coerce(
    key: &str,
    value: Value,
    spec: Option<&ParameterSpec>,
    reserved: &ReservedKeys,
    delimiter: &str,
) -> Value {
    if spec.is_some_and(ParameterSpec::is_multiple) {
        return match value {
            Value::String(s) => Value::Array(
                s.split(delimiter)
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            ),
            other => other,
        };
    }

    let is_boolean =
        spec.is_some_and(|s| s.param_type == ParamType::Boolean) || reserved.is_boolean(key);
    if is_boolean {
        return match value {
            Value::Bool(_) => value,
            other => Value::Bool(utils::to_bool(&other)),
        };
    }

    value
}

/// Applies `coerce` with a fixed schema, reserved key set and delimiter.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    schema: &'a ParameterSchema,
    reserved: &'a ReservedKeys,
    delimiter: &'a str,
}

impl<'a> Coercer<'a> {
    pub fn new(schema: &'a ParameterSchema, reserved: &'a ReservedKeys, delimiter: &'a str) -> Self {
        Self {
            schema,
            reserved,
            delimiter,
        }
    }

    pub fn coerce(&self, key: &str, value: Value) -> Value {
        coerce(
            key,
            value,
            self.schema.get(key),
            self.reserved,
            self.delimiter,
        )
    }

    /// Coerce every entry of a raw map, keeping key order.
    pub fn coerce_map(&self, raw: ConfigMap) -> ConfigMap {
        raw.into_iter()
            .map(|(key, value)| {
                let value = self.coerce(&key, value);
                (key, value)
            })
            .collect()
    }
}
