//! # File Loading
//!
//! Local file sources:
//! - the JSON config file of initial inputs
//! - the previous-run results file (`key = value` lines, removed once merged)
//! - the app descriptor carrying the parameter schema
//!
//! A missing config or results file is not an error. A malformed one is
//! logged and treated as empty by the non-`try_` variants.

use errors::SourceError;
use inputs_core::{ConfigMap, ParameterSchema, ParameterSpec};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Load a JSON config file, strictly.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Reads a JSON object of initial inputs.
///
/// ## Usage
/// ```rust,no_run
/// use config::try_load_config_file;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let inputs = try_load_config_file(Path::new("app_config.json"))?;
///     println!("{} inputs", inputs.len());
///     Ok(())
/// }
/// ```
///
/// ## Error Handling
/// - Missing file: `Ok` with an empty map
/// - Unreadable file: `SourceError::Io`
/// - Invalid JSON or a non-object document: `SourceError::Parse`
pub fn try_load_config_file(path: &Path) -> Result<ConfigMap, SourceError> {
    if !path.is_file() {
        return Ok(ConfigMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SourceError::Parse {
            path: path.display().to_string(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(SourceError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Load a JSON config file, logging and swallowing every failure.
pub fn load_config_file(path: &Path) -> ConfigMap {
    if !path.is_file() {
        tracing::error!("Could not load configuration file \"{}\".", path.display());
        return ConfigMap::new();
    }
    try_load_config_file(path).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Ignoring configuration file");
        ConfigMap::new()
    })
}

/// Where the results file of a previous run lives.
///
/// `<out_path>/<file_name>` when `out_path` is an existing writable
/// directory, otherwise `<file_name>` relative to the working directory.
pub fn results_file_path(out_path: Option<&str>, file_name: &str) -> PathBuf {
    let writable_dir = |dir: &Path| {
        std::fs::metadata(dir)
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
    };
    match out_path.map(Path::new) {
        Some(dir) if writable_dir(dir) => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Parse results file contents.
///
/// Each line is `key = value`; lines without ` = ` are skipped. `true` and
/// `false` become booleans and an empty value becomes null.
pub fn parse_results(contents: &str) -> ConfigMap {
    let mut results = ConfigMap::new();
    for line in contents.trim().lines() {
        let Some((key, value)) = line.split_once(" = ") else {
            continue;
        };
        let value = match value {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "" => Value::Null,
            other => Value::String(other.to_string()),
        };
        results.insert(key.to_string(), value);
    }
    results
}

/// Read the results file, strictly, leaving it in place.
///
/// A missing file is `Ok` with an empty map.
pub fn try_read_results_file(path: &Path) -> Result<ConfigMap, SourceError> {
    if !path.is_file() {
        return Ok(ConfigMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_results(&contents))
}

/// Read the results file, logging and swallowing failures.
pub fn read_results_file(path: &Path) -> ConfigMap {
    try_read_results_file(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring results file");
        ConfigMap::new()
    })
}

/// Delete a consumed results file. A missing file is not an error.
pub fn remove_results_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Consumed results file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Could not remove results file"),
    }
}

/// App descriptor: the parameter declarations and list delimiter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
    #[serde(default)]
    pub params: Vec<ParameterSpec>,

    #[serde(default)]
    pub list_delimiter: Option<String>,
}

impl AppDescriptor {
    pub fn schema(&self) -> ParameterSchema {
        self.params.iter().cloned().collect()
    }
}

/// Load an app descriptor from a JSON file.
///
/// Unlike the config file, a missing descriptor is an error.
pub fn load_schema(path: &Path) -> Result<AppDescriptor, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| SourceError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
