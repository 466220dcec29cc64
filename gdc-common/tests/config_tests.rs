//! Unit tests for configuration loading and API key resolution
//!
//! Covers:
//! - Missing TOML file → compiled defaults, startup continues
//! - Malformed TOML file → configuration error
//! - API key priority: environment over TOML
//! - Missing API key → configuration error before any request
//! - Prompt override file loading
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate OPENAI_API_KEY are marked with #[serial].

use gdc_common::config::{
    load_toml_config, resolve_api_key, resolve_api_key_from, ServiceConfig, TomlConfig,
    API_KEY_ENV, DEFAULT_MODEL,
};
use gdc_common::{Error, PromptConfig};
use serial_test::serial;
use std::env;
use tempfile::TempDir;

#[test]
fn test_missing_toml_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.model, DEFAULT_MODEL);
    assert!(config.openai_api_key.is_none());
    assert!(config.prompt_file.is_none());
}

#[test]
fn test_toml_file_values_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gdc-web.toml");
    std::fs::write(
        &path,
        r#"
openai_api_key = "sk-from-toml"
model = "gpt-4.1"
api_base_url = "http://127.0.0.1:9000/v1"
max_upload_bytes = 1048576
session_ttl_secs = 900

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.openai_api_key.as_deref(), Some("sk-from-toml"));
    assert_eq!(config.model, "gpt-4.1");
    assert_eq!(config.api_base_url, "http://127.0.0.1:9000/v1");
    assert_eq!(config.max_upload_bytes, 1_048_576);
    assert_eq!(config.session_ttl_secs, 900);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gdc-web.toml");
    std::fs::write(&path, "model = [unterminated").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_env_key_takes_priority_over_toml() {
    let config = TomlConfig {
        openai_api_key: Some("sk-toml".to_string()),
        ..TomlConfig::default()
    };

    let key = resolve_api_key_from(Some("sk-env".to_string()), &config).unwrap();
    assert_eq!(key, "sk-env");
}

#[test]
fn test_blank_env_key_falls_back_to_toml() {
    let config = TomlConfig {
        openai_api_key: Some("sk-toml".to_string()),
        ..TomlConfig::default()
    };

    let key = resolve_api_key_from(Some("   ".to_string()), &config).unwrap();
    assert_eq!(key, "sk-toml");
}

#[test]
fn test_missing_key_everywhere_is_config_error() {
    let err = resolve_api_key_from(None, &TomlConfig::default()).unwrap_err();
    match err {
        Error::Config(msg) => {
            assert!(msg.contains(API_KEY_ENV));
            assert!(msg.contains(".env files are not read"));
        }
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_resolve_api_key_reads_environment() {
    env::set_var(API_KEY_ENV, "sk-from-env");

    let key = resolve_api_key(&TomlConfig::default()).unwrap();
    assert_eq!(key, "sk-from-env");

    // Cleanup
    env::remove_var(API_KEY_ENV);
}

#[test]
#[serial]
fn test_service_config_fails_without_key() {
    env::remove_var(API_KEY_ENV);

    let result = ServiceConfig::resolve(&TomlConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_service_config_loads_prompt_override() {
    let temp_dir = TempDir::new().unwrap();
    let prompt_path = temp_dir.path().join("prompt.toml");
    std::fs::write(
        &prompt_path,
        "version = \"site-b-2\"\ntext = \"\"\"\nCompare the two drawings.\n\"\"\"\n",
    )
    .unwrap();

    let toml_config = TomlConfig {
        prompt_file: Some(prompt_path),
        ..TomlConfig::default()
    };
    let config = ServiceConfig::with_api_key("sk-test".to_string(), &toml_config).unwrap();

    assert_eq!(config.prompt.version, "site-b-2");
    assert_eq!(config.prompt.text, "Compare the two drawings.\n");
}

#[test]
fn test_service_config_missing_prompt_file_is_error() {
    let toml_config = TomlConfig {
        prompt_file: Some("/nonexistent/gdc/prompt.toml".into()),
        ..TomlConfig::default()
    };

    let result = ServiceConfig::with_api_key("sk-test".to_string(), &toml_config);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_service_config_debug_never_shows_key() {
    let config =
        ServiceConfig::with_api_key("sk-very-secret".to_string(), &TomlConfig::default()).unwrap();
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("sk-very-secret"));
    assert_eq!(config.prompt, PromptConfig::builtin());
}
