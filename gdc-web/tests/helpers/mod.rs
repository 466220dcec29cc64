//! Shared test utilities for gdc-web integration tests
//!
//! - In-memory PNG/JPEG drawing fixtures
//! - Multipart body builder for upload requests
//! - Recording comparator standing in for the inference service
//! - Gated comparator holding calls in flight until released
//! - Response body helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use gdc_web::services::{ComparisonError, DrawingComparator};
use gdc_web::{build_router, AppState};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tower::ServiceExt;

pub const BOUNDARY: &str = "gdc-test-boundary-7MA4YWxkTrZu0gW";

/// Solid-color drawing of the given size, encoded in `format`
pub fn drawing_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([240, 240, 240]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

/// multipart/form-data body with a single `file` field
pub fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Recorded comparator call: (previous payload, current payload)
pub type Call = (String, String);

/// Comparator that records calls and answers with a fixed outcome
pub struct StubComparator {
    pub calls: Mutex<Vec<Call>>,
    reply: Result<String, String>,
}

impl StubComparator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DrawingComparator for StubComparator {
    async fn compare(&self, previous: &str, current: &str) -> Result<String, ComparisonError> {
        self.calls
            .lock()
            .unwrap()
            .push((previous.to_string(), current.to_string()));
        self.reply
            .clone()
            .map_err(ComparisonError::Network)
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn prompt_version(&self) -> &str {
        "stub-prompt"
    }
}

/// Comparator whose calls stay in flight until `release` is notified
pub struct GatedComparator {
    /// Notified once per call when it starts
    pub entered: Notify,
    /// Notify once per call to let it answer
    pub release: Notify,
    calls: AtomicUsize,
    reply: String,
}

impl GatedComparator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            reply: text.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DrawingComparator for GatedComparator {
    async fn compare(&self, _previous: &str, _current: &str) -> Result<String, ComparisonError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "gated-model"
    }

    fn prompt_version(&self) -> &str {
        "gated-prompt"
    }
}

/// Test app around a comparator
#[derive(Clone)]
pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new(comparator: Arc<dyn DrawingComparator>) -> Self {
        Self {
            state: AppState::new(comparator, 20 * 1024 * 1024),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        build_router(self.state.clone()).oneshot(request).await.unwrap()
    }

    pub async fn create_session(&self) -> String {
        let response = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let json = body_json(response).await;
        json["session_id"].as_str().unwrap().to_string()
    }

    pub async fn upload(
        &self,
        session_id: &str,
        role: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Response<Body> {
        let content_type = if file_name.ends_with(".png") {
            "image/png"
        } else {
            "image/jpeg"
        };
        self.send(
            Request::builder()
                .method("POST")
                .uri(format!("/api/sessions/{}/drawings/{}", session_id, role))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(file_name, content_type, bytes)))
                .unwrap(),
        )
        .await
    }

    pub async fn compare(&self, session_id: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(format!("/api/sessions/{}/compare", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn clear(&self, session_id: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sessions/{}/result", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Poll the session status until it reports `state`
    pub async fn wait_for_state(&self, session_id: &str, state: &str) -> Value {
        for _ in 0..200 {
            let status = self.status(session_id).await;
            if status["state"] == state {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "session {} never reached {}: {}",
            session_id,
            state,
            self.status(session_id).await
        );
    }

    pub async fn status(&self, session_id: &str) -> Value {
        let response = self
            .send(
                Request::builder()
                    .uri(format!("/api/sessions/{}", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        body_json(response).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
