#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Layered configuration loading: defaults, YAML file, `TGW_` environment.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use transit_gateway::{
    AuthConfig, ErrorHandling, TlsRoots, TransitGatewayConfig, TransitGatewayError,
};

/// Variables the tests below set; every test starts with all of them unset.
const TGW_VARS: &[&str] = &[
    "TGW_BASE_URL",
    "TGW_API_VERSION",
    "TGW_ALLOW_INSECURE_HTTP",
    "TGW_POLL__MAX_ATTEMPTS",
    "TGW_POLL__ERROR_HANDLING",
    "TGW_AUTH__TYPE",
    "TGW_AUTH__TOKEN",
];

fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut all: Vec<(&str, Option<&str>)> = TGW_VARS.iter().map(|name| (*name, None)).collect();
    for &(name, value) in vars {
        all.retain(|(existing, _)| *existing != name);
        all.push((name, Some(value)));
    }
    temp_env::with_vars(all, f)
}

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load(path: Option<&Path>) -> Result<TransitGatewayConfig, TransitGatewayError> {
    TransitGatewayConfig::load(path)
}

#[test]
fn test_defaults_without_file_or_env() {
    let config = with_env(&[], || load(None)).unwrap();

    assert_eq!(config.base_url, "https://transit.cloud.ibm.com/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.tls_roots, TlsRoots::WebPki);
    assert_eq!(config.poll.max_attempts, 25);
    assert!(matches!(config.auth, AuthConfig::None));
}

#[test]
fn test_yaml_file_overrides_defaults() {
    let file = yaml_file(
        r#"
base_url: "https://eu-de.transit.example.test/v1"
request_timeout: 45s
tls_roots: native
auth:
  type: iam
  api_key: "yaml-api-key"
poll:
  max_attempts: 10
  gateway_interval: 2s
  error_handling: retry_all
logging:
  level: "transit_gateway=debug"
  json: true
"#,
    );

    let config = with_env(&[], || load(Some(file.path()))).unwrap();

    assert_eq!(config.base_url, "https://eu-de.transit.example.test/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(45));
    assert_eq!(config.tls_roots, TlsRoots::Native);
    assert_eq!(config.poll.max_attempts, 10);
    assert_eq!(config.poll.gateway_interval, Duration::from_secs(2));
    assert_eq!(config.poll.deletion_interval, Duration::from_secs(10));
    assert_eq!(config.poll.error_handling, ErrorHandling::RetryAll);
    assert!(config.logging.json);
    match config.auth {
        AuthConfig::Iam {
            api_key, token_url, ..
        } => {
            assert_eq!(api_key.expose(), "yaml-api-key");
            assert_eq!(token_url, "https://iam.cloud.ibm.com/identity/token");
        }
        other => panic!("expected iam auth, got {other:?}"),
    }
}

#[test]
fn test_environment_overrides_file() {
    let file = yaml_file("poll:\n  max_attempts: 10\n");

    let config = with_env(
        &[
            ("TGW_POLL__MAX_ATTEMPTS", "3"),
            ("TGW_API_VERSION", "2023-12-05"),
        ],
        || load(Some(file.path())),
    )
    .unwrap();

    assert_eq!(config.poll.max_attempts, 3);
    assert_eq!(config.api_version, "2023-12-05");
}

#[test]
fn test_bearer_auth_from_environment() {
    let config = with_env(
        &[("TGW_AUTH__TYPE", "bearer"), ("TGW_AUTH__TOKEN", "env-token")],
        || load(None),
    )
    .unwrap();

    let AuthConfig::Bearer { token } = config.auth else {
        panic!("expected bearer auth");
    };
    assert_eq!(token.expose(), "env-token");
    assert!(!format!("{token:?}").contains("env-token"));
}

#[test]
fn test_missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let err = with_env(&[], || load(Some(&missing))).unwrap_err();

    assert!(matches!(err, TransitGatewayError::Configuration(_)));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_unknown_key_rejected() {
    let file = yaml_file("base_urll: \"https://typo.example.test/v1\"\n");

    let err = with_env(&[], || load(Some(file.path()))).unwrap_err();

    assert!(matches!(err, TransitGatewayError::Configuration(_)));
}

#[test]
fn test_plain_http_needs_explicit_opt_in() {
    let err = with_env(&[("TGW_BASE_URL", "http://127.0.0.1:9000/v1")], || load(None))
        .unwrap_err();
    assert!(matches!(err, TransitGatewayError::Configuration(_)));

    let config = with_env(
        &[
            ("TGW_BASE_URL", "http://127.0.0.1:9000/v1"),
            ("TGW_ALLOW_INSECURE_HTTP", "true"),
        ],
        || load(None),
    )
    .unwrap();
    assert!(config.allow_insecure_http);
}

#[test]
fn test_zero_attempts_rejected() {
    let err = with_env(&[("TGW_POLL__MAX_ATTEMPTS", "0")], || load(None)).unwrap_err();

    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn test_unparsable_duration_rejected() {
    let file = yaml_file("request_timeout: soon\n");

    let err = with_env(&[], || load(Some(file.path()))).unwrap_err();

    assert!(matches!(err, TransitGatewayError::Configuration(_)));
}
