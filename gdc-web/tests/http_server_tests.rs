//! HTTP Server & Routing Integration Tests
//!
//! Page, static assets, health, and session lifecycle routes.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helpers::{body_json, body_text, StubComparator, TestApp};

fn app() -> TestApp {
    TestApp::new(StubComparator::replying("unused"))
}

#[tokio::test]
async fn test_root_route_serves_html() {
    let app = app();

    let response = app
        .send(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("Geotechnical Drawing Comparison Tool"));
    assert!(html.contains("Start Comparison"));
    assert!(html.contains("Clear Comparison Results"));
    assert!(html.contains("Powered by stub-model"));
    // Markup after the download links must survive template formatting
    assert!(html.contains(r##"id="download-md" href="#""##));
    assert!(html.contains(r#"<div class="comparison-results" id="result-body"></div>"#));
    assert!(html.contains(r#"<script src="/static/compare.js"></script>"#));
    assert!(html.trim_end().ends_with("</html>"));
}

#[tokio::test]
async fn test_page_header_shows_build_stamp() {
    let git_hash = env!("GIT_HASH");
    let hash = git_hash.strip_suffix("-dirty").unwrap_or(git_hash);
    assert!(
        hash == "unknown" || (hash.len() == 8 && hash.chars().all(|c| c.is_ascii_hexdigit())),
        "unexpected GIT_HASH {:?}",
        git_hash
    );

    let response = app()
        .send(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await;
    let html = body_text(response).await;
    assert!(html.contains(&format!("{} ({})", git_hash, env!("BUILD_PROFILE"))));
    assert!(html.contains(env!("BUILD_TIMESTAMP")));
}

#[tokio::test]
async fn test_static_assets_served() {
    let app = app();

    for (uri, content_type) in [
        ("/static/gdc-ui.css", "text/css"),
        ("/static/compare.js", "application/javascript"),
    ] {
        let response = app
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK, "{} should be served", uri);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            content_type,
            "{} content type",
            uri
        );
    }
}

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let app = app();

    let response = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "gdc-web");
    assert_eq!(json["model"], "stub-model");
    assert_eq!(json["prompt_version"], "stub-prompt");
    assert_eq!(json["active_sessions"], 0);
    assert!(json["uptime_seconds"].is_u64());
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();

    let session_id = app.create_session().await;
    let status = app.status(&session_id).await;
    assert_eq!(status["session_id"], session_id.as_str());
    assert_eq!(status["state"], "AWAITING_DRAWINGS");
    assert!(status["previous"].is_null());
    assert!(status["current"].is_null());
    assert!(status["result"].is_null());

    let response = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sessions/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(
            Request::builder()
                .uri(format!("/api/sessions/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();

    let response = app
        .compare("00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_role_is_bad_request() {
    let app = app();
    let session_id = app.create_session().await;

    let response = app
        .upload(&session_id, "before", "plan.png", b"irrelevant")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}
