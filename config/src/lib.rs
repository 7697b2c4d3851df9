//! # Inputs Engine
//!
//! Layered runtime inputs for one app run.
//!
//! This crate provides:
//! - Source loaders (command line, config file, results file, blocking
//!   queue, remote parameter service, environment defaults)
//! - Schema-driven type coercion
//! - Precedence-aware merging (command line values are never overwritten)
//! - Two-level indirection resolution (environment, key/value broker)
//! - The `Inputs` orchestrator tying them together
//!
//! # Best Practices
//!
//! - Uses `validator` crate for settings validation
//! - Settings are passed per orchestrator; nothing is process-wide
//! - Typed and resolved views are distinct snapshot types

pub mod cli;
pub mod coercion;
pub mod file_loader;
pub mod inputs;
pub mod loader;
pub mod precedence;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod secure_params;
pub mod settings;
pub mod snapshot;
pub mod substitution;
pub mod validation;

pub use cli::{CommandLineArgs, CommandLineLoader, FlagKind};
pub use coercion::{Coercer, coerce};
pub use file_loader::{
    AppDescriptor, load_config_file, load_schema, parse_results, read_results_file,
    remove_results_file, results_file_path, try_load_config_file, try_read_results_file,
};
pub use inputs::{Collaborators, Inputs, InputsState};
pub use loader::load_from_env;
pub use precedence::ConfigStore;
pub use queue::load_queue_params;
pub use registry::InMemoryTokenRegistry;
pub use resolver::{resolve_env, resolve_env_value, resolve_snapshot};
pub use secure_params::{HttpParameterService, PARAMETERS_PATH, load_secure_params};
pub use settings::InputsSettings;
pub use snapshot::{ArgsSnapshot, ResolvedSnapshot};
pub use substitution::populate_system_variables;
pub use validation::validate_settings;
