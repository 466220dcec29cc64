//! # GDC Common Library
//!
//! Shared code for the drawing comparison service:
//! - Error types
//! - Bootstrap configuration loading (CLI → ENV → TOML → defaults)
//! - Instructional prompt configuration

pub mod config;
pub mod error;
pub mod prompt;

pub use error::{Error, Result};
pub use prompt::PromptConfig;
