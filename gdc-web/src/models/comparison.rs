//! Comparison result model and export

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::services::render_markdown;

/// Prefix of the plain-text rendering of a failed comparison
pub const ERROR_PREFIX: &str = "Error occurred: ";

/// What came back from the inference service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// Model text, verbatim
    Succeeded(String),
    /// Failure reason (without the prefix)
    Failed(String),
}

impl ComparisonOutcome {
    pub fn from_result<E: Display>(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => ComparisonOutcome::Succeeded(text),
            Err(e) => ComparisonOutcome::Failed(e.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, ComparisonOutcome::Succeeded(_))
    }

    /// Single-channel text rendering
    ///
    /// Failures become `"Error occurred: <message>"`, indistinguishable in
    /// shape from model text. Shown to users and written to exports.
    pub fn to_text(&self) -> String {
        match self {
            ComparisonOutcome::Succeeded(text) => text.clone(),
            ComparisonOutcome::Failed(reason) => format!("{}{}", ERROR_PREFIX, reason),
        }
    }
}

/// Latest comparison held by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub outcome: ComparisonOutcome,
    /// Local time the comparison completed; names the export files
    pub generated_at: DateTime<Local>,
}

/// Export flavor; both carry identical content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Md,
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Md => "md",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Md => "text/markdown; charset=utf-8",
            ExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md" | "markdown" => Ok(ExportFormat::Md),
            "txt" | "text" => Ok(ExportFormat::Txt),
            other => Err(format!("Unknown export format '{}'", other)),
        }
    }
}

impl ComparisonResult {
    pub fn new(outcome: ComparisonOutcome, generated_at: DateTime<Local>) -> Self {
        Self {
            outcome,
            generated_at,
        }
    }

    pub fn text(&self) -> String {
        self.outcome.to_text()
    }

    /// `comparison_result_<YYYYMMDD_HHMMSS>.<ext>`
    pub fn export_filename(&self, format: ExportFormat) -> String {
        format!(
            "comparison_result_{}.{}",
            self.generated_at.format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    }

    /// Export body: the result text copied verbatim
    pub fn export_content(&self, _format: ExportFormat) -> String {
        self.text()
    }

    pub fn view(&self) -> ResultView {
        let text = self.text();
        ResultView {
            html: render_markdown(&text),
            text,
            succeeded: self.outcome.succeeded(),
            generated_at: self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            markdown_filename: self.export_filename(ExportFormat::Md),
            text_filename: self.export_filename(ExportFormat::Txt),
        }
    }
}

/// Serializable view of a comparison result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultView {
    /// Result text, verbatim
    pub text: String,
    /// Result text rendered from markdown, raw HTML escaped
    pub html: String,
    pub succeeded: bool,
    /// "Generated on" caption, `YYYY-MM-DD HH:MM:SS`
    pub generated_at: String,
    pub markdown_filename: String,
    pub text_filename: String,
}
