//! # Remote Parameter Service
//!
//! Loads job execution parameters ("secure params") from the platform API.
//!
//! Any failure here is fatal: a non-success status or a body without an
//! `inputs` object aborts initialization with `ConfigFetchError`.

use crate::coercion::Coercer;
use async_trait::async_trait;
use errors::{ConfigFetchError, InputsError};
use inputs_core::{ConfigMap, ParameterService};
use serde_json::Value;

/// Path of the parameters endpoint, relative to the API base URL.
pub const PARAMETERS_PATH: &str = "/internal/job/execution/parameters";

/// Fetch the parameters and coerce them.
pub async fn load_secure_params(
    service: &dyn ParameterService,
    token: Option<&str>,
    coercer: &Coercer<'_>,
) -> Result<ConfigMap, InputsError> {
    tracing::info!("Loading secure params.");
    let params = service.fetch_parameters(token).await?;
    Ok(coercer.coerce_map(params))
}

/// `ParameterService` backed by the platform HTTP API.
#[derive(Debug, Clone)]
pub struct HttpParameterService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpParameterService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PARAMETERS_PATH)
    }
}

/// Pull the `inputs` object out of a response body.
pub fn parse_parameters_body(body: &str) -> Result<ConfigMap, ConfigFetchError> {
    let malformed = || ConfigFetchError::MalformedBody {
        detail: body.to_string(),
    };
    match serde_json::from_str::<Value>(body).map_err(|_| malformed())? {
        Value::Object(mut root) => match root.remove("inputs") {
            Some(Value::Object(inputs)) => Ok(inputs),
            _ => Err(malformed()),
        },
        _ => Err(malformed()),
    }
}

#[async_trait]
impl ParameterService for HttpParameterService {
    async fn fetch_parameters(&self, token: Option<&str>) -> Result<ConfigMap, ConfigFetchError> {
        let mut request = self.client.get(self.endpoint());
        if let Some(token) = token {
            request = request.header("Authorization", format!("TC-Token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConfigFetchError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = if body.is_empty() {
                status
                    .canonical_reason()
                    .map_or_else(|| status.as_u16().to_string(), str::to_string)
            } else {
                body
            };
            tracing::error!(status = status.as_u16(), %detail, "Secure params request failed");
            return Err(ConfigFetchError::BadStatus {
                status: status.as_u16(),
                detail,
            });
        }

        parse_parameters_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_parameters_body() {
        let inputs = parse_parameters_body(
            r#"{"inputs": {"tc_playbook_db_type": "Redis", "fail_on_error": true}}"#,
        )
        .unwrap();
        assert_eq!(inputs["tc_playbook_db_type"], json!("Redis"));
        assert_eq!(inputs["fail_on_error"], json!(true));
    }

    #[test]
    fn test_parse_parameters_body_rejects_wrong_shape() {
        for body in ["", "not json", "[]", r#"{"params": {}}"#, r#"{"inputs": "x"}"#] {
            let err = parse_parameters_body(body).unwrap_err();
            assert!(
                matches!(err, ConfigFetchError::MalformedBody { .. }),
                "{body}"
            );
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service = HttpParameterService::new("https://api.example.test/api/");
        assert_eq!(
            service.endpoint(),
            "https://api.example.test/api/internal/job/execution/parameters"
        );
    }
}
