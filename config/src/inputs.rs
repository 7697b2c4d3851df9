//! # Inputs Orchestrator
//!
//! Sequences the sources into one typed snapshot, then resolves it.
//!
//! # States
//! - `Unparsed`: constructed, or the last parse failed
//! - `Parsed`: command line, results file, queue and remote parameters merged
//! - `Resolved`: the resolved view of the parsed snapshot is cached
//!
//! A failed parse leaves the previous snapshot untouched and the state at
//! `Unparsed`; nothing partially merged is ever visible through `args()`.

use crate::cli::CommandLineLoader;
use crate::coercion::Coercer;
use crate::file_loader::{
    load_config_file, read_results_file, remove_results_file, results_file_path,
};
use crate::precedence::ConfigStore;
use crate::queue::load_queue_params;
use crate::registry::InMemoryTokenRegistry;
use crate::resolver::resolve_snapshot;
use crate::secure_params::load_secure_params;
use crate::settings::InputsSettings;
use crate::snapshot::{ArgsSnapshot, ResolvedSnapshot};
use crate::validation::validate_settings;
use errors::InputsError;
use inputs_core::types::keys;
use inputs_core::{
    ConfigMap, KeyValueStore, ParameterSchema, ParameterService, QueueBroker, Source,
    TokenRegistrar,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InputsState {
    Unparsed,
    Parsed,
    Resolved,
}

/// External systems the orchestrator talks to.
///
/// Only the registrar is mandatory. A missing queue broker or parameter
/// service is an error only when the matching flag is enabled; a missing
/// key/value store skips the second resolution level.
#[derive(Clone)]
pub struct Collaborators {
    pub registrar: Arc<dyn TokenRegistrar>,
    pub queue: Option<Arc<dyn QueueBroker>>,
    pub parameters: Option<Arc<dyn ParameterService>>,
    pub store: Option<Arc<dyn KeyValueStore>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            registrar: Arc::new(InMemoryTokenRegistry::default()),
            queue: None,
            parameters: None,
            store: None,
        }
    }
}

/// Layered inputs for one app run.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Owns the settings, parameter schema, collaborators and invocation of one
/// app run, and exposes the typed (`args`) and resolved (`resolved`) views.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Collaborators, Inputs, InputsSettings};
/// use inputs_core::{ConfigMap, ParameterSchema};
///
/// # async fn run() -> Result<(), errors::InputsError> {
/// let invocation = vec!["--owner=Acme".to_string()];
/// let mut inputs = Inputs::new(
///     InputsSettings::default(),
///     ParameterSchema::default(),
///     Collaborators::default(),
///     ConfigMap::new(),
///     invocation,
/// )?;
/// let args = inputs.parse().await?;
/// println!("{} inputs", args.len());
/// let resolved = inputs.resolve().await?;
/// println!("owner = {:?}", resolved.get_str("owner"));
/// # Ok(())
/// # }
/// ```
///
/// ## Error Handling
/// - Invalid settings: `InputsError::InvalidSettings` from `new`
/// - Malformed command line: `InputsError::CommandLine`
/// - Remote parameter failure: `InputsError::ConfigFetch`, state stays `Unparsed`
/// - Queue broker failure: `InputsError::Queue`
pub struct Inputs {
    settings: InputsSettings,
    schema: ParameterSchema,
    collaborators: Collaborators,
    invocation: Vec<String>,
    snapshot: ArgsSnapshot,
    parsed: bool,
    resolved: Option<ResolvedSnapshot>,
    unknown: Vec<String>,
}

impl std::fmt::Debug for Inputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inputs")
            .field("state", &self.state())
            .field("keys", &self.snapshot.len())
            .field("unknown", &self.unknown)
            .finish()
    }
}

impl Inputs {
    /// Build an orchestrator over `config` plus the configured config file.
    ///
    /// Nothing is parsed yet; the config file is the only source read here.
    pub fn new(
        settings: InputsSettings,
        schema: ParameterSchema,
        collaborators: Collaborators,
        config: ConfigMap,
        invocation: Vec<String>,
    ) -> Result<Self, InputsError> {
        validate_settings(&settings)?;

        let mut base = config;
        if let Some(path) = &settings.config_file {
            base.extend(load_config_file(path));
        }
        let base = Coercer::new(&schema, &settings.reserved, &settings.list_delimiter)
            .coerce_map(base);

        Ok(Self {
            settings,
            schema,
            collaborators,
            invocation,
            snapshot: ArgsSnapshot::from_map(base),
            parsed: false,
            resolved: None,
            unknown: Vec::new(),
        })
    }

    pub fn state(&self) -> InputsState {
        match (self.parsed, self.resolved.is_some()) {
            (_, true) => InputsState::Resolved,
            (true, false) => InputsState::Parsed,
            (false, false) => InputsState::Unparsed,
        }
    }

    /// The typed snapshot, once parsed.
    pub fn args(&self) -> Option<&ArgsSnapshot> {
        self.parsed.then_some(&self.snapshot)
    }

    /// The resolved snapshot, once resolved.
    pub fn resolved(&self) -> Option<&ResolvedSnapshot> {
        self.resolved.as_ref()
    }

    /// Invocation tokens that matched no declared flag in the last parse.
    pub fn unknown_args(&self) -> &[String] {
        &self.unknown
    }

    pub fn settings(&self) -> &InputsSettings {
        &self.settings
    }

    /// Parse all sources once; later calls return the cached snapshot.
    pub async fn parse(&mut self) -> Result<&ArgsSnapshot, InputsError> {
        if !self.parsed {
            self.run_parse().await?;
        }
        Ok(&self.snapshot)
    }

    /// Drop both views and run the full parse again over the current snapshot.
    ///
    /// The results file is only removed by a successful parse, so a retry
    /// after a failed parse still sees it. A queue payload is different: once
    /// popped it is gone, so a retry after a later source failed waits for a
    /// new payload on the channel.
    pub async fn reparse(&mut self) -> Result<&ArgsSnapshot, InputsError> {
        self.parsed = false;
        self.resolved = None;
        self.run_parse().await?;
        Ok(&self.snapshot)
    }

    /// Resolve the parsed snapshot once, parsing first when needed.
    pub async fn resolve(&mut self) -> Result<&ResolvedSnapshot, InputsError> {
        let resolved = match self.resolved.take() {
            Some(resolved) => resolved,
            None => {
                self.parse().await?;
                resolve_snapshot(
                    &self.snapshot,
                    &self.settings.reserved,
                    self.collaborators.store.as_deref(),
                )
                .await?
            }
        };
        Ok(&*self.resolved.insert(resolved))
    }

    /// Discard the cached resolved view and resolve again.
    pub async fn reresolve(&mut self) -> Result<&ResolvedSnapshot, InputsError> {
        self.resolved = None;
        self.resolve().await
    }

    async fn run_parse(&mut self) -> Result<(), InputsError> {
        let (snapshot, unknown, results_path) = self.merge_sources().await?;
        remove_results_file(&results_path);
        for arg in &unknown {
            tracing::warn!("Unsupported arg found ({}).", arg);
        }
        self.snapshot = snapshot;
        self.unknown = unknown;
        self.parsed = true;
        Ok(())
    }

    /// Run every source against a copy of the current snapshot.
    ///
    /// Also returns the results file path, for removal once the parse is kept.
    async fn merge_sources(
        &self,
    ) -> Result<(ArgsSnapshot, Vec<String>, PathBuf), InputsError> {
        let reserved = &self.settings.reserved;
        let coercer = Coercer::new(&self.schema, reserved, &self.settings.list_delimiter);

        let cli = CommandLineLoader::new(&self.schema, reserved).load(&self.invocation)?;
        let mut store = ConfigStore::new(
            self.snapshot.as_map().clone(),
            cli.protected,
            Arc::clone(&self.collaborators.registrar),
            self.settings.context_id.clone(),
        );
        store.merge(coercer.coerce_map(cli.values), Source::CommandLine, false);

        let results_path = results_file_path(
            store.snapshot().get_str(keys::OUT_PATH),
            &self.settings.results_file_name,
        );
        let results = read_results_file(&results_path);
        store.merge(coercer.coerce_map(results), Source::ResultsFile, true);

        if store.snapshot().flag(keys::QUEUE_ENABLED) {
            let broker = self.collaborators.queue.as_deref().ok_or_else(|| {
                InputsError::MissingCollaborator {
                    flag: keys::QUEUE_ENABLED.to_string(),
                    collaborator: "queue broker",
                }
            })?;
            let channel = store
                .snapshot()
                .get_str(keys::QUEUE_CHANNEL)
                .filter(|channel| !channel.is_empty())
                .ok_or_else(|| InputsError::MissingKey {
                    key: keys::QUEUE_CHANNEL.to_string(),
                })?
                .to_string();
            let params = load_queue_params(broker, &channel, &coercer).await?;
            store.merge(params, Source::BlockingQueue, true);
        }

        if store.snapshot().flag(keys::SECURE_PARAMS) {
            let service = self.collaborators.parameters.as_deref().ok_or_else(|| {
                InputsError::MissingCollaborator {
                    flag: keys::SECURE_PARAMS.to_string(),
                    collaborator: "parameter service",
                }
            })?;
            let token = store.snapshot().get_str(keys::TOKEN).map(str::to_string);
            let params = load_secure_params(service, token.as_deref(), &coercer).await?;
            store.merge(params, Source::RemoteService, true);
        }

        derive_keys(&mut store);
        Ok((store.into_snapshot(), cli.unknown, results_path))
    }
}

/// Keys computed from other keys once every source is merged.
fn derive_keys(store: &mut ConfigStore) {
    let service_id = store
        .snapshot()
        .get_str(keys::SVC_CLIENT_TOPIC)
        .and_then(|topic| topic.split('-').nth(2))
        .map(str::to_string);
    if let Some(service_id) = service_id {
        store.set_if_unset(keys::SERVICE_ID, Value::String(service_id));
    }

    let logging = store
        .snapshot()
        .get(keys::LOGGING)
        .filter(|value| !value.is_null())
        .cloned();
    if let Some(logging) = logging {
        store.set_if_unset(keys::LOG_LEVEL, logging);
    }
}
