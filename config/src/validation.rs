//! # Settings Validation
//!
//! Validates `InputsSettings` with the `validator` crate before any source
//! is read.

use crate::settings::InputsSettings;
use errors::InputsError;
use validator::Validate;

/// Validate settings, flattening validator output into `InputsError`.
pub fn validate_settings(settings: &InputsSettings) -> Result<(), InputsError> {
    settings
        .validate()
        .map_err(|e| InputsError::InvalidSettings {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_settings() {
        assert!(validate_settings(&InputsSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_delimiter() {
        let settings = InputsSettings {
            list_delimiter: String::new(),
            ..InputsSettings::default()
        };
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(err, InputsError::InvalidSettings { .. }));
        assert!(err.to_string().contains("list_delimiter"));
    }

    #[test]
    fn test_validate_empty_results_file_name() {
        let settings = InputsSettings {
            results_file_name: String::new(),
            ..InputsSettings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_empty_context_id() {
        let settings = InputsSettings {
            context_id: String::new(),
            ..InputsSettings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: InputsSettings =
            serde_json::from_str(r#"{"list_delimiter": ","}"#).unwrap();
        assert_eq!(settings.list_delimiter, ",");
        assert_eq!(settings.results_file_name, "results.tc");
        assert!(settings.reserved.is_boolean("tc_verify"));
    }
}
