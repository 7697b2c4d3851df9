//! # Inputs Engine Core
//!
//! Shared types, traits, and the variable grammar for the layered inputs
//! engine.
//!
//! This crate provides:
//! - Parameter schema types used for type coercion
//! - Reserved key sets and well-known key names
//! - Collaborator traits for the queue broker, parameter service, key/value
//!   broker and token registrar
//! - The variable grammar (`#App:9876:http.content!Binary`)

pub mod traits;
pub mod types;
pub mod variable;

// Re-export commonly used types for convenience
pub use traits::{KeyValueStore, ParameterService, QueueBroker, TokenRegistrar};
pub use types::{
    ConfigMap, Credential, ParamType, ParameterSchema, ParameterSpec, ReservedKeys, Source,
};
pub use variable::{
    BaseType, InvalidVariable, Namespace, VariableKind, VariableToken, find_variables, is_variable,
    substitute_variables,
};
