//! Instructional prompt configuration
//!
//! The comparison rubric is a versioned configuration value. The built-in
//! version ships with the crate (`prompts/comparison-v1.txt`); a deployment
//! may replace it with a TOML file:
//!
//! ```toml
//! version = "2025-01-site-b"
//! text = """
//! ...
//! """
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Version tag of the built-in rubric
pub const BUILTIN_PROMPT_VERSION: &str = "comparison-v1";

const BUILTIN_PROMPT_TEXT: &str = include_str!("../prompts/comparison-v1.txt");

/// Instructional text sent ahead of the two drawings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptConfig {
    /// Free-form version tag, reported by `/health`
    pub version: String,
    /// Prompt text, sent verbatim
    pub text: String,
}

impl PromptConfig {
    /// Built-in geotechnical drawing rubric
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_PROMPT_VERSION.to_string(),
            text: BUILTIN_PROMPT_TEXT.to_string(),
        }
    }

    /// Load a prompt override from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read prompt file {} failed: {}", path.display(), e))
        })?;
        let prompt = Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        info!(
            version = %prompt.version,
            "Loaded prompt override from {}",
            path.display()
        );
        Ok(prompt)
    }

    /// Parse prompt TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let prompt: PromptConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse prompt failed: {}", e)))?;

        if prompt.version.trim().is_empty() {
            return Err(Error::Config("Prompt version cannot be empty".to_string()));
        }
        if prompt.text.trim().is_empty() {
            return Err(Error::Config("Prompt text cannot be empty".to_string()));
        }
        Ok(prompt)
    }
}
