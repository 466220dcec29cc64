//! Drawing intake and JPEG/base64 encoding
//!
//! Uploads are sniffed and decoded into a bitmap; for a comparison, each
//! bitmap is re-encoded as JPEG (codec default quality) and wrapped in
//! base64 for embedding in the JSON request body.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, Rgb, RgbImage};
use thiserror::Error;

use crate::models::UploadedImage;

/// Encoder errors
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("Unsupported image format: {0} (expected JPEG or PNG)")]
    UnsupportedFormat(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("JPEG encode error: {0}")]
    Encode(String),
}

/// Sniff, validate and decode one uploaded drawing
///
/// Only JPEG and PNG are accepted. The format comes from the bytes, not
/// the file name.
pub fn decode_upload(file_name: &str, bytes: Vec<u8>) -> Result<UploadedImage, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::EmptyUpload);
    }

    let format = image::guess_format(&bytes)
        .map_err(|_| EncodeError::UnsupportedFormat("unrecognized".to_string()))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(EncodeError::UnsupportedFormat(format!("{:?}", format)));
    }

    let bitmap = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| EncodeError::Decode(e.to_string()))?;

    tracing::debug!(
        file_name = file_name,
        format = ?format,
        width = bitmap.width(),
        height = bitmap.height(),
        "Decoded drawing upload"
    );

    Ok(UploadedImage {
        file_name: file_name.to_string(),
        format,
        bytes,
        bitmap,
        uploaded_at: Utc::now(),
    })
}

/// Re-encode a bitmap as JPEG and return its base64 text
pub fn encode_jpeg_base64(bitmap: &DynamicImage) -> Result<String, EncodeError> {
    let jpeg = encode_jpeg(bitmap)?;
    Ok(STANDARD.encode(jpeg))
}

/// Re-encode a bitmap as JPEG bytes (default quality)
pub fn encode_jpeg(bitmap: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();

    // JPEG carries neither alpha nor 16-bit samples
    let result = match bitmap.color() {
        ColorType::L8 | ColorType::Rgb8 => {
            bitmap.write_with_encoder(JpegEncoder::new(&mut buffer))
        }
        _ => DynamicImage::ImageRgb8(flatten_onto_white(bitmap))
            .write_with_encoder(JpegEncoder::new(&mut buffer)),
    };
    result.map_err(|e| EncodeError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Wrap a base64 JPEG payload as a data URI
pub fn jpeg_data_uri(base64_payload: &str) -> String {
    format!("data:image/jpeg;base64,{}", base64_payload)
}

/// Composite onto a white sheet so transparent regions stay paper-colored
fn flatten_onto_white(bitmap: &DynamicImage) -> RgbImage {
    let rgba = bitmap.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    rgb
}
