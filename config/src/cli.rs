//! # Command Line Loader
//!
//! Parses the app invocation against declared flags.
//!
//! Unknown flags are collected, not rejected; the orchestrator logs each one
//! as a warning. An unknown `--name=value` or `--name value` still carries its
//! value into the snapshot. Every key that reached the snapshot from the
//! command line is protected from later `preserve` merges.
//!
//! Switch values stay strings here; the coercer applies the boolean rules so
//! `--flag=yes` means the same as `flag = yes` in any other source.

use clap::{Arg, ArgAction, Command};
use errors::InputsError;
use inputs_core::types::keys;
use inputs_core::{ConfigMap, ParamType, ParameterSchema, ReservedKeys};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// How a declared flag consumes the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `--flag` is `true`; `--flag=<text>` is coerced like any boolean
    Switch,
    /// `--flag value` or `--flag=value`
    Value,
}

/// Output of one command-line parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLineArgs {
    /// Values of every flag that was present with a value
    pub values: ConfigMap,
    /// Keys of `values`
    pub protected: BTreeSet<String>,
    /// Tokens that matched no declared flag
    pub unknown: Vec<String>,
}

/// Keys read by the engine that are not in the reserved sets.
const RUNTIME_VALUE_KEYS: &[&str] = &[keys::QUEUE_CHANNEL, keys::SVC_CLIENT_TOPIC];

/// Declared flags for one app.
#[derive(Debug, Clone, Default)]
pub struct CommandLineLoader {
    flags: BTreeMap<String, FlagKind>,
}

impl CommandLineLoader {
    /// Declare the reserved runtime flags and every parameter in `schema`.
    pub fn new(schema: &ParameterSchema, reserved: &ReservedKeys) -> Self {
        let mut loader = Self::default();
        for key in &reserved.no_resolve {
            loader = loader.declare(key, FlagKind::Value);
        }
        for key in RUNTIME_VALUE_KEYS {
            loader = loader.declare(key, FlagKind::Value);
        }
        for key in &reserved.boolean {
            loader = loader.declare(key, FlagKind::Switch);
        }
        for spec in schema.iter() {
            let kind = if spec.param_type == ParamType::Boolean {
                FlagKind::Switch
            } else {
                FlagKind::Value
            };
            loader = loader.declare(&spec.name, kind);
        }
        loader
    }

    /// Declare (or redeclare) one flag.
    #[must_use]
    pub fn declare(mut self, name: &str, kind: FlagKind) -> Self {
        self.flags.insert(name.to_string(), kind);
        self
    }

    pub fn kind(&self, name: &str) -> Option<FlagKind> {
        self.flags.get(name).copied()
    }

    /// Parse `invocation` (without the program name).
    pub fn load(&self, invocation: &[String]) -> Result<CommandLineArgs, InputsError> {
        let (known, unknown, undeclared) = self.partition(invocation);

        let matches = self
            .command()
            .try_get_matches_from(known)
            .map_err(|e| InputsError::CommandLine {
                reason: e.to_string().trim().to_string(),
            })?;

        let mut values = undeclared;
        for name in self.flags.keys() {
            if let Some(value) = matches.get_one::<String>(name) {
                values.insert(name.clone(), Value::String(value.clone()));
            }
        }

        Ok(CommandLineArgs {
            protected: values.keys().cloned().collect(),
            values,
            unknown,
        })
    }

    fn command(&self) -> Command {
        let mut command = Command::new("app")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);

        for (name, kind) in &self.flags {
            let arg = Arg::new(name.clone()).long(name.clone());
            let arg = match kind {
                FlagKind::Switch => arg
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true"),
                FlagKind::Value => arg
                    .action(ArgAction::Set)
                    .num_args(1)
                    .allow_hyphen_values(true),
            };
            command = command.arg(arg);
        }
        command
    }

    /// Split the invocation into tokens clap should see, unknown tokens, and
    /// the values carried by unknown flags (last occurrence wins).
    fn partition(&self, invocation: &[String]) -> (Vec<String>, Vec<String>, ConfigMap) {
        let mut known = Vec::new();
        let mut unknown = Vec::new();
        let mut undeclared = ConfigMap::new();
        let mut tokens = invocation.iter().peekable();

        while let Some(token) = tokens.next() {
            let Some(body) = token.strip_prefix("--") else {
                unknown.push(token.clone());
                continue;
            };
            let (name, inline_value) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            match self.kind(name) {
                Some(FlagKind::Switch) => known.push(token.clone()),
                Some(FlagKind::Value) => {
                    known.push(token.clone());
                    if inline_value.is_none() {
                        if let Some(value) = tokens.next() {
                            known.push(value.clone());
                        }
                    }
                }
                None => {
                    unknown.push(token.clone());
                    let value = match inline_value {
                        Some(value) => Some(value.to_string()),
                        None => tokens
                            .next_if(|next| !next.starts_with("--"))
                            .inspect(|value| unknown.push((*value).clone()))
                            .cloned(),
                    };
                    if let Some(value) = value.filter(|_| !name.is_empty()) {
                        undeclared.insert(name.to_string(), Value::String(value));
                    }
                }
            }
        }
        (known, unknown, undeclared)
    }
}
