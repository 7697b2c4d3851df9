//! # Environment Defaults Loader
//!
//! Builds a base layer of standard runtime inputs from environment
//! variables, for running an app locally outside its platform.

use inputs_core::ConfigMap;
use serde_json::Value;
use std::env;

/// Load default runtime inputs from environment variables.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Produces the lowest-priority layer of inputs. Values that are absent from
/// the environment fall back to the local-run defaults below.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// let defaults = load_from_env();
/// println!("log level: {}", defaults["tc_log_level"]);
/// ```
///
/// ## Environment Variables
/// - `API_ACCESS_ID`, `API_DEFAULT_ORG`, `API_SECRET_KEY`, `TC_API_PATH`:
///   null when unset
/// - `TC_IN_PATH`, `TC_LOG_PATH`, `TC_OUT_PATH`, `TC_TEMP_PATH`: default "log"
/// - `TC_LOG_LEVEL`: default "trace"
/// - `TC_LOG_TO_API`, `TC_PROXY_EXTERNAL`, `TC_PROXY_TC`: booleans, default false
/// - `TC_PROXY_HOST` (default "localhost"), `TC_PROXY_PORT` (default "4242"),
///   `TC_PROXY_USERNAME`, `TC_PROXY_PASSWORD` (default "")
/// - `TC_TOKEN`, `TC_TOKEN_EXPIRES`: only included when `TC_TOKEN` is set
pub fn load_from_env() -> ConfigMap {
    let mut defaults = ConfigMap::new();

    for (key, var) in [
        ("api_access_id", "API_ACCESS_ID"),
        ("api_default_org", "API_DEFAULT_ORG"),
        ("api_secret_key", "API_SECRET_KEY"),
        ("tc_api_path", "TC_API_PATH"),
    ] {
        defaults.insert(key.to_string(), optional_env(var));
    }

    for (key, var, default) in [
        ("tc_in_path", "TC_IN_PATH", "log"),
        ("tc_log_level", "TC_LOG_LEVEL", "trace"),
        ("tc_log_path", "TC_LOG_PATH", "log"),
        ("tc_out_path", "TC_OUT_PATH", "log"),
        ("tc_proxy_host", "TC_PROXY_HOST", "localhost"),
        ("tc_proxy_password", "TC_PROXY_PASSWORD", ""),
        ("tc_proxy_port", "TC_PROXY_PORT", "4242"),
        ("tc_proxy_username", "TC_PROXY_USERNAME", ""),
        ("tc_temp_path", "TC_TEMP_PATH", "log"),
    ] {
        let value = env::var(var).unwrap_or_else(|_| default.to_string());
        defaults.insert(key.to_string(), Value::String(value));
    }

    for (key, var) in [
        ("tc_log_to_api", "TC_LOG_TO_API"),
        ("tc_proxy_external", "TC_PROXY_EXTERNAL"),
        ("tc_proxy_tc", "TC_PROXY_TC"),
    ] {
        defaults.insert(key.to_string(), Value::Bool(parse_bool_env(var)));
    }

    if let Ok(token) = env::var("TC_TOKEN") {
        if !token.is_empty() {
            defaults.insert("tc_token".to_string(), Value::String(token));
            defaults.insert("tc_token_expires".to_string(), optional_env("TC_TOKEN_EXPIRES"));
        }
    }

    defaults
}

fn optional_env(var: &str) -> Value {
    env::var(var).map(Value::String).unwrap_or(Value::Null)
}

fn parse_bool_env(var: &str) -> bool {
    env::var(var).is_ok_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
