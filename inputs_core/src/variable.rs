//! # Variable Grammar
//!
//! Parses and formats structured variable identifiers of the form
//! `#<Namespace>:<id>:<dotted.name>!<Type>`, for example
//! `#App:9876:http.content!Binary`.
//!
//! A failed parse is not an error: `VariableToken::parse` returns `None` and
//! is routinely used as a predicate.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const BODY: &str = r"#([A-Za-z]+):(\d+):([A-Za-z0-9_.\-\[\]]+)!([A-Za-z0-9_-]+)";

static VARIABLE_MATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{BODY}$")).expect("static variable pattern"));

static VARIABLE_SEARCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BODY).expect("static variable pattern"));

/// Leading segment of a variable (`#App`, `#Trigger`, or anything else).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    App,
    Trigger,
    Custom(String),
}

impl Namespace {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "App" => Self::App,
            "Trigger" => Self::Trigger,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "App"),
            Self::Trigger => write!(f, "Trigger"),
            Self::Custom(tag) => write!(f, "{tag}"),
        }
    }
}

/// Built-in value types. Each one also exists as an `...Array` kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Binary,
    KeyValue,
    TCEntity,
    TCEnhancedEntity,
}

impl BaseType {
    const ALL: [Self; 5] = [
        Self::String,
        Self::Binary,
        Self::KeyValue,
        Self::TCEntity,
        Self::TCEnhancedEntity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Binary => "Binary",
            Self::KeyValue => "KeyValue",
            Self::TCEntity => "TCEntity",
            Self::TCEnhancedEntity => "TCEnhancedEntity",
        }
    }
}

/// The `!<Type>` suffix of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Scalar(BaseType),
    Array(BaseType),
    /// A custom type; never starts with a built-in type keyword.
    Custom(String),
}

impl VariableKind {
    fn from_suffix(suffix: &str) -> Option<Self> {
        for base in BaseType::ALL {
            if suffix == base.as_str() {
                return Some(Self::Scalar(base));
            }
            if suffix.strip_suffix("Array") == Some(base.as_str()) {
                return Some(Self::Array(base));
            }
        }
        // custom names may not shadow a built-in keyword
        if BaseType::ALL
            .iter()
            .any(|base| suffix.starts_with(base.as_str()))
        {
            return None;
        }
        Some(Self::Custom(suffix.to_string()))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(base) => write!(f, "{}", base.as_str()),
            Self::Array(base) => write!(f, "{}Array", base.as_str()),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Parsed variable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableToken {
    pub namespace: Namespace,
    pub id: u64,
    pub dotted_name: String,
    pub kind: VariableKind,
}

/// Returned by `FromStr` when a string is not a variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not a variable: {input}")]
pub struct InvalidVariable {
    pub input: String,
}

impl VariableToken {
    /// Parse a full variable string. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = VARIABLE_MATCH.captures(input.trim())?;
        Self::from_parts(&caps[1], &caps[2], &caps[3], &caps[4])
    }

    fn from_parts(tag: &str, id: &str, name: &str, suffix: &str) -> Option<Self> {
        Some(Self {
            namespace: Namespace::from_tag(tag),
            id: id.parse().ok()?,
            dotted_name: name.to_string(),
            kind: VariableKind::from_suffix(suffix)?,
        })
    }

    /// Build an `#App` output variable for a job.
    pub fn output_variable(job_id: u64, name: &str, type_name: &str) -> Option<Self> {
        Self::parse(&format!("#App:{job_id}:{name}!{type_name}"))
    }

    /// The `!<Type>` suffix as written.
    pub fn type_name(&self) -> String {
        self.kind.to_string()
    }

    /// Stable identifier: `http.content!Binary` becomes `http_content_binary`.
    pub fn method_name(&self) -> String {
        format!(
            "{}_{}",
            self.dotted_name.replace('.', "_").to_lowercase(),
            self.type_name().to_lowercase()
        )
    }
}

impl fmt::Display for VariableToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}:{}:{}!{}",
            self.namespace, self.id, self.dotted_name, self.kind
        )
    }
}

impl FromStr for VariableToken {
    type Err = InvalidVariable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidVariable {
            input: s.to_string(),
        })
    }
}

/// True when `input` is exactly one variable.
pub fn is_variable(input: &str) -> bool {
    VariableToken::parse(input).is_some()
}

/// Every variable embedded in `text`, in order of appearance.
pub fn find_variables(text: &str) -> Vec<VariableToken> {
    VARIABLE_SEARCH
        .captures_iter(text)
        .filter_map(|caps| VariableToken::from_parts(&caps[1], &caps[2], &caps[3], &caps[4]))
        .collect()
}

/// Replace each embedded variable with the value returned by `lookup`.
///
/// Variables for which `lookup` returns `None` are left as written.
pub fn substitute_variables<F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&VariableToken) -> Option<String>,
{
    VARIABLE_SEARCH
        .replace_all(text, |caps: &regex::Captures<'_>| {
            VariableToken::from_parts(&caps[1], &caps[2], &caps[3], &caps[4])
                .and_then(|token| lookup(&token))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
