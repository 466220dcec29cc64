//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (handled by the binary)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error: the service starts on defaults and
//! logs a warning. A malformed file is a configuration error.

use crate::prompt::PromptConfig;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the inference API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default vision-capable model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default base URL of the chat-completion API
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default upload size limit per request (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Default idle time before a session and its drawings are dropped (1 hour)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes to the TOML file.
#[derive(Clone, Deserialize)]
pub struct TomlConfig {
    /// Inference API key (environment variable takes priority)
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Model identifier sent with every comparison request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat-completion API (without `/chat/completions`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional TOML file replacing the built-in instructional prompt
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,

    /// Maximum accepted upload body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Seconds a session may sit idle before it is dropped
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            api_base_url: default_api_base_url(),
            prompt_file: None,
            max_upload_bytes: default_max_upload_bytes(),
            session_ttl_secs: default_session_ttl_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

// The API key must never reach the logs.
impl fmt::Debug for TomlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TomlConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("prompt_file", &self.prompt_file)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Default TOML config path for the platform
///
/// `~/.config/gdc/gdc-web.toml` on Linux, the platform config directory
/// elsewhere, `./gdc-web.toml` if no config directory can be determined.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("gdc").join("gdc-web.toml"))
        .unwrap_or_else(|| PathBuf::from("gdc-web.toml"))
}

/// Load bootstrap configuration from a TOML file
///
/// Missing file → compiled defaults (with a warning).
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the inference API key from the environment, then TOML
pub fn resolve_api_key(toml_config: &TomlConfig) -> Result<String> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), toml_config)
}

/// Resolve the inference API key from an explicit environment value
///
/// **Priority:** ENV → TOML
pub fn resolve_api_key_from(env_key: Option<String>, toml_config: &TomlConfig) -> Result<String> {
    let env_key = env_key.filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .openai_api_key
        .as_ref()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "API key found in multiple sources: environment, TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("API key loaded from environment variable");
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("API key loaded from TOML config");
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "Inference API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: {} (openai_api_key = \"your-key\")\n\
         Note: .env files are not read; export {} in the shell or service unit instead.",
        API_KEY_ENV,
        default_config_path().display(),
        API_KEY_ENV
    )))
}

/// Fully resolved service configuration
///
/// Produced once at startup; everything the comparison path needs.
#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub prompt: PromptConfig,
    pub max_upload_bytes: usize,
    pub session_ttl: Duration,
}

impl ServiceConfig {
    /// Resolve API key and prompt from the loaded TOML config
    ///
    /// Fails before any request can be attempted if the key is missing.
    pub fn resolve(toml_config: &TomlConfig) -> Result<Self> {
        let api_key = resolve_api_key(toml_config)?;
        Self::with_api_key(api_key, toml_config)
    }

    /// Build from an already resolved key
    pub fn with_api_key(api_key: String, toml_config: &TomlConfig) -> Result<Self> {
        if !is_valid_key(&api_key) {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }
        if toml_config.model.trim().is_empty() {
            return Err(Error::Config("model cannot be empty".to_string()));
        }
        if toml_config.session_ttl_secs == 0 {
            return Err(Error::Config(
                "session_ttl_secs must be greater than zero".to_string(),
            ));
        }

        let prompt = match &toml_config.prompt_file {
            Some(path) => PromptConfig::load(path)?,
            None => PromptConfig::builtin(),
        };

        Ok(Self {
            api_key,
            model: toml_config.model.clone(),
            api_base_url: toml_config.api_base_url.trim_end_matches('/').to_string(),
            prompt,
            max_upload_bytes: toml_config.max_upload_bytes,
            session_ttl: Duration::from_secs(toml_config.session_ttl_secs),
        })
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("prompt_version", &self.prompt.version)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}
