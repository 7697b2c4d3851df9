//! # Engine Settings
//!
//! Settings that shape one inputs orchestrator instance. They are passed in
//! by value; nothing here is process-wide.

use inputs_core::ReservedKeys;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Settings for an inputs orchestrator.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Names the optional JSON config file, the results file, the MultiChoice
/// delimiter and the token registrar context, plus the reserved key sets.
///
/// ## Usage
/// ```rust,no_run
/// use config::InputsSettings;
///
/// let settings = InputsSettings {
///     list_delimiter: ",".to_string(),
///     ..InputsSettings::default()
/// };
/// assert_eq!(settings.results_file_name, "results.tc");
/// ```
///
/// ## Validation
/// - `results_file_name`, `list_delimiter`, `context_id`: at least 1 character
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct InputsSettings {
    /// JSON file of initial inputs, applied below the command line
    pub config_file: Option<PathBuf>,

    /// File name of the previous-run results file
    #[validate(length(min = 1))]
    pub results_file_name: String,

    /// Delimiter used to split MultiChoice values
    #[validate(length(min = 1))]
    pub list_delimiter: String,

    /// Context id handed to the token registrar
    #[validate(length(min = 1))]
    pub context_id: String,

    #[serde(skip)]
    pub reserved: ReservedKeys,
}

impl Default for InputsSettings {
    fn default() -> Self {
        Self {
            config_file: None,
            results_file_name: "results.tc".to_string(),
            list_delimiter: "|".to_string(),
            context_id: "MainThread".to_string(),
            reserved: ReservedKeys::default(),
        }
    }
}
