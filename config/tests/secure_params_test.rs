use config::{Coercer, HttpParameterService, PARAMETERS_PATH, load_secure_params};
use errors::{ConfigFetchError, InputsError};
use inputs_core::{ParamType, ParameterSchema, ParameterService, ParameterSpec, ReservedKeys};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_parameters_success() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .and(header("Authorization", "TC-Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inputs": {"owner": "Beta", "debug_mode": "true"}
        })))
        .mount(&mock_server)
        .await;

    let params = service.fetch_parameters(Some("abc123")).await.unwrap();
    assert_eq!(params["owner"], json!("Beta"));
    assert_eq!(params["debug_mode"], json!("true"));
}

#[tokio::test]
async fn test_fetch_parameters_without_token_sends_no_auth_header() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inputs": {}})))
        .mount(&mock_server)
        .await;

    let params = service.fetch_parameters(None).await.unwrap();
    assert!(params.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_fetch_parameters_server_error() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = service.fetch_parameters(Some("abc")).await.unwrap_err();
    assert_eq!(
        err,
        ConfigFetchError::BadStatus {
            status: 500,
            detail: "Internal Server Error".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Error retrieving secure params from API (Internal Server Error)"
    );
}

#[tokio::test]
async fn test_fetch_parameters_error_body_is_reported() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let err = service.fetch_parameters(Some("abc")).await.unwrap_err();
    assert!(err.to_string().contains("token expired"));
}

#[tokio::test]
async fn test_fetch_parameters_malformed_body() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = service.fetch_parameters(None).await.unwrap_err();
    assert!(matches!(err, ConfigFetchError::MalformedBody { .. }));
}

#[tokio::test]
async fn test_load_secure_params_coerces_values() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(PARAMETERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inputs": {"debug_mode": "no", "tags": "a,b,c"}
        })))
        .mount(&mock_server)
        .await;

    let schema: ParameterSchema = vec![
        ParameterSpec::new("debug_mode", ParamType::Boolean),
        ParameterSpec::new("tags", ParamType::MultiChoice),
    ]
    .into_iter()
    .collect();
    let reserved = ReservedKeys::default();
    let coercer = Coercer::new(&schema, &reserved, ",");

    let params = load_secure_params(&service, None, &coercer).await.unwrap();
    assert_eq!(params["debug_mode"], json!(false));
    assert_eq!(params["tags"], json!(["a", "b", "c"]));
}

#[tokio::test]
async fn test_load_secure_params_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let service = HttpParameterService::new(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let schema = ParameterSchema::default();
    let reserved = ReservedKeys::default();
    let coercer = Coercer::new(&schema, &reserved, "|");

    let err = load_secure_params(&service, None, &coercer).await.unwrap_err();
    assert!(matches!(err, InputsError::ConfigFetch(_)));
}
