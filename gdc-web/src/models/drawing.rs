//! Uploaded drawing model

use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slot a drawing is bound to
///
/// The order matters downstream: the previous drawing is always sent first
/// ("before"), the current drawing second ("after").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingRole {
    Previous,
    Current,
}

impl DrawingRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawingRole::Previous => "previous",
            DrawingRole::Current => "current",
        }
    }

    /// Caption shown under the preview
    pub fn caption(&self) -> &'static str {
        match self {
            DrawingRole::Previous => "Previous Version",
            DrawingRole::Current => "Current Version",
        }
    }
}

impl fmt::Display for DrawingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawingRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previous" => Ok(DrawingRole::Previous),
            "current" => Ok(DrawingRole::Current),
            other => Err(format!(
                "Unknown drawing role '{}' (expected 'previous' or 'current')",
                other
            )),
        }
    }
}

/// One user-supplied drawing: original bytes plus decoded bitmap
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub format: ImageFormat,
    /// Bytes as uploaded, served back for previews
    pub bytes: Vec<u8>,
    pub bitmap: DynamicImage,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedImage {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// MIME type of the original upload
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn summary(&self, role: DrawingRole) -> DrawingSummary {
        DrawingSummary {
            role,
            file_name: self.file_name.clone(),
            format: format_name(self.format).to_string(),
            width: self.width(),
            height: self.height(),
            size_bytes: self.bytes.len(),
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Serializable view of a bound drawing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingSummary {
    pub role: DrawingRole,
    pub file_name: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        _ => "other",
    }
}
