use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use strum::{Display, EnumString};

/// Ordered key/value map used for every raw and merged configuration view.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Well-known keys the engine itself reads.
pub mod keys {
    pub const TOKEN: &str = "tc_token";
    pub const TOKEN_EXPIRES: &str = "tc_token_expires";
    pub const QUEUE_ENABLED: &str = "tc_aot_enabled";
    pub const QUEUE_CHANNEL: &str = "tc_action_channel";
    pub const SECURE_PARAMS: &str = "tc_secure_params";
    pub const OUT_PATH: &str = "tc_out_path";
    pub const LOG_LEVEL: &str = "tc_log_level";
    pub const LOGGING: &str = "logging";
    pub const SVC_CLIENT_TOPIC: &str = "tc_svc_client_topic";
    pub const SERVICE_ID: &str = "service_id";

    /// Keys whose values are masked in logs.
    pub const SECRETS: &[&str] = &["api_secret_key", "tc_token", "tc_proxy_password"];
}

/// Origin of a raw key/value map. Only used for precedence reasoning and
/// logging; never stored on the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Defaults,
    CommandLine,
    ConfigFile,
    ResultsFile,
    BlockingQueue,
    RemoteService,
}

/// Declared type of an app parameter.
///
/// Matching is case-insensitive. Types the engine does not coerce are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Boolean,
    MultiChoice,
    Choice,
    KeyValueList,
    Other(String),
}

impl From<String> for ParamType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "multichoice" => Self::MultiChoice,
            "choice" => Self::Choice,
            "keyvaluelist" => Self::KeyValueList,
            _ => Self::Other(value),
        }
    }
}

impl From<ParamType> for String {
    fn from(value: ParamType) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Boolean => write!(f, "Boolean"),
            Self::MultiChoice => write!(f, "MultiChoice"),
            Self::Choice => write!(f, "Choice"),
            Self::KeyValueList => write!(f, "KeyValueList"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Schema entry for one app parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub name: String,

    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: ParamType,

    #[serde(default, deserialize_with = "deserialize_loose_bool")]
    pub allow_multiple: bool,
}

fn default_param_type() -> ParamType {
    ParamType::String
}

/// Descriptors write `allowMultiple` both as a JSON bool and as a string.
fn deserialize_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            allow_multiple: false,
        }
    }

    #[must_use]
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// True when raw values must be split into a sequence.
    pub fn is_multiple(&self) -> bool {
        self.param_type == ParamType::MultiChoice || self.allow_multiple
    }
}

/// Read-only lookup of parameter specs by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    params: HashMap<String, ParameterSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<ParameterSpec> for ParameterSchema {
    fn from_iter<I: IntoIterator<Item = ParameterSpec>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|spec| (spec.name.clone(), spec))
                .collect(),
        }
    }
}

const BOOLEAN_KEYS: &[&str] = &[
    "apply_proxy_external",
    "apply_proxy_ext",
    "apply_proxy_tc",
    "batch_halt_on_error",
    "tc_aot_enabled",
    "tc_log_to_api",
    "tc_proxy_external",
    "tc_proxy_tc",
    "tc_secure_params",
    "tc_verify",
];

const NO_RESOLVE_KEYS: &[&str] = &[
    "tc_token",
    "tc_token_expires",
    "api_access_id",
    "api_secret_key",
    "batch_action",
    "batch_chunk",
    "batch_halt_on_error",
    "batch_poll_interval",
    "batch_interval_max",
    "batch_write_type",
    "tc_playbook_db_type",
    "tc_playbook_db_context",
    "tc_playbook_db_path",
    "tc_playbook_db_port",
    "tc_playbook_out_variables",
    "api_default_org",
    "tc_api_path",
    "tc_in_path",
    "tc_log_file",
    "tc_log_path",
    "tc_out_path",
    "tc_secure_params",
    "tc_temp_path",
    "tc_user_id",
    "tc_proxy_host",
    "tc_proxy_port",
    "tc_proxy_username",
    "tc_proxy_password",
    "tc_proxy_external",
    "tc_proxy_tc",
    "tc_log_to_api",
    "tc_log_level",
    "logging",
];

/// Reserved runtime keys: the boolean-typed ones, and the ones that are
/// never passed through key/value indirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedKeys {
    pub boolean: BTreeSet<String>,
    pub no_resolve: BTreeSet<String>,
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            boolean: BOOLEAN_KEYS.iter().map(|k| (*k).to_string()).collect(),
            no_resolve: NO_RESOLVE_KEYS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

impl ReservedKeys {
    pub fn is_boolean(&self, key: &str) -> bool {
        self.boolean.contains(key)
    }

    pub fn is_no_resolve(&self, key: &str) -> bool {
        self.no_resolve.contains(key)
    }
}

/// Authentication token forwarded to the token registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub value: String,
    pub expires_at: String,
}
