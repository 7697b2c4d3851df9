use colored::Colorize;
use errors::InputsError;
use inputs_core::types::keys;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

pub fn queue_broker_missing(message: &str) -> UxError {
    UxError::new(message)
        .why("tc_aot_enabled asks for one queued payload before the app starts")
        .fix("Pass --redis-url so queued params can be read")
        .fix("Or drop --tc_aot_enabled from the app arguments")
        .suggest("inputs args --redis-url redis://localhost:6379 -- --tc_aot_enabled --tc_action_channel <channel>")
}

pub fn parameter_service_missing(message: &str) -> UxError {
    UxError::new(message)
        .why("tc_secure_params asks for job parameters from the platform API")
        .fix("Pass --api-url pointing at the platform API")
        .fix("Or drop --tc_secure_params from the app arguments")
}

pub fn secure_params_failed(message: &str) -> UxError {
    UxError::new(message)
        .why("The secure params request failed, so nothing was parsed")
        .fix("Check that --api-url is reachable")
        .fix("Check that --tc_token is valid and not expired")
}

pub fn invalid_app_arguments(reason: &str) -> UxError {
    UxError::new("Invalid app arguments")
        .why(reason.to_string())
        .fix("Put app arguments after `--`")
        .suggest("inputs args -- --tc_log_path /tmp/log")
}

pub fn missing_required_key(key: &str) -> UxError {
    UxError::new(format!("Missing required input: '{}'", key))
        .why("An enabled source needs this input to run")
        .fix(format!("Provide --{} in the app arguments", key))
}

/// Friendly explanation for the errors a user can fix from the command line.
pub fn for_inputs_error(err: &InputsError) -> Option<UxError> {
    let message = err.to_string();
    match err {
        InputsError::MissingCollaborator { flag, .. } if flag == keys::QUEUE_ENABLED => {
            Some(queue_broker_missing(&message))
        }
        InputsError::MissingCollaborator { .. } => Some(parameter_service_missing(&message)),
        InputsError::ConfigFetch(_) => Some(secure_params_failed(&message)),
        InputsError::CommandLine { reason } => Some(invalid_app_arguments(reason)),
        InputsError::MissingKey { key } => Some(missing_required_key(key)),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::ConfigFetchError;

    #[test]
    fn test_ux_error_new() {
        let err = UxError::new("test error");
        assert_eq!(err.what, "test error");
        assert!(err.why.is_none());
        assert!(err.how_to_fix.is_empty());
        assert!(err.suggested_command.is_none());
    }

    #[test]
    fn test_ux_error_builder_chain() {
        let err = UxError::new("what")
            .why("why")
            .fix("first")
            .fix("second")
            .suggest("inputs args");
        assert_eq!(err.why.as_deref(), Some("why"));
        assert_eq!(err.how_to_fix, ["first", "second"]);
        assert_eq!(err.suggested_command.as_deref(), Some("inputs args"));
    }

    #[test]
    fn test_ux_error_display() {
        let err = UxError::new("Something went wrong");
        assert_eq!(err.to_string(), "Something went wrong");
        err.display();
    }

    #[test]
    fn test_missing_queue_broker() {
        let err = InputsError::MissingCollaborator {
            flag: "tc_aot_enabled".to_string(),
            collaborator: "queue broker"
        };
        let ux = for_inputs_error(&err).unwrap();
        assert!(ux.what.contains("no queue broker"));
        assert!(ux.how_to_fix[0].contains("--redis-url"));
    }

    #[test]
    fn test_missing_parameter_service() {
        let err = InputsError::MissingCollaborator {
            flag: "tc_secure_params".to_string(),
            collaborator: "parameter service"
        };
        let ux = for_inputs_error(&err).unwrap();
        assert!(ux.how_to_fix[0].contains("--api-url"));
    }

    #[test]
    fn test_secure_params_failed() {
        let err = InputsError::from(ConfigFetchError::BadStatus {
            status: 500,
            detail: "Internal Server Error".to_string()
        });
        let ux = for_inputs_error(&err).unwrap();
        assert_eq!(
            ux.what,
            "Error retrieving secure params from API (Internal Server Error)"
        );
    }

    #[test]
    fn test_missing_required_key() {
        let err = InputsError::MissingKey {
            key: "tc_action_channel".to_string()
        };
        let ux = for_inputs_error(&err).unwrap();
        assert!(ux.how_to_fix[0].contains("--tc_action_channel"));
    }

    #[test]
    fn test_other_errors_have_no_explanation() {
        let err = InputsError::InvalidSettings {
            reason: "list_delimiter".to_string()
        };
        assert!(for_inputs_error(&err).is_none());
    }
}
