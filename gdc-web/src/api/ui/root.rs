//! Root page handler - drawing comparison page

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

use crate::AppState;

/// GET /
///
/// Upload panes for both drawings, Start Comparison, results panel with
/// downloads, sidebar with About/Clear/Tips.
pub async fn root_page(State(state): State<AppState>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let model = escape_html(state.comparator.model());

    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Geotechnical Drawing Comparison</title>
    <link rel="stylesheet" href="/static/gdc-ui.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>🏗️ Geotechnical Drawing Comparison Tool</h1>
                <p class="subtitle">Compare previous and current versions of geotechnical drawings with AI-powered analysis</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">gdc-web v{version}</div>
                <div class="build-info-line">{git_hash} ({build_profile})</div>
                <div class="build-info-line">{build_timestamp}</div>
            </div>
        </div>
    </header>

    <div class="layout">
        <main class="content">
            <div class="columns">
                <section class="pane" data-role="previous">
                    <h2>📄 Previous Version</h2>
                    <label class="upload-label" for="upload-previous">Upload Previous Drawing</label>
                    <input type="file" id="upload-previous" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
                    <figure class="preview hidden" id="preview-previous">
                        <img alt="Previous Version">
                        <figcaption>Previous Version</figcaption>
                    </figure>
                </section>
                <section class="pane" data-role="current">
                    <h2>📄 Current Version</h2>
                    <label class="upload-label" for="upload-current">Upload Current Drawing</label>
                    <input type="file" id="upload-current" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
                    <figure class="preview hidden" id="preview-current">
                        <img alt="Current Version">
                        <figcaption>Current Version</figcaption>
                    </figure>
                </section>
            </div>

            <button class="button primary wide" id="start-comparison">🔍 Start Comparison</button>
            <div class="notice hidden" id="notice"></div>

            <section class="results hidden" id="results">
                <hr>
                <h2>📊 Comparison Results</h2>
                <p class="caption" id="generated-on"></p>
                <div class="comparison-results" id="result-body"></div>
                <div class="downloads">
                    <a class="button" id="download-md" href="#">📥 Download Results (Markdown)</a>
                    <a class="button" id="download-txt" href="#">📥 Download Results (Text)</a>
                </div>
            </section>
        </main>

        <aside class="sidebar">
            <h2>ℹ️ About</h2>
            <p>This tool compares geotechnical drawings and identifies:</p>
            <ul>
                <li>Changes in location &amp; shape</li>
                <li>Wall construction methods</li>
                <li>Support methods</li>
                <li>Excavation levels</li>
                <li>Material specifications</li>
                <li>Construction sequences</li>
                <li>Other drawing changes</li>
            </ul>

            <h2>🔧 Settings</h2>
            <button class="button" id="clear-results">Clear Comparison Results</button>

            <h2>📝 Tips</h2>
            <ul>
                <li>Upload high-quality images for best results</li>
                <li>Ensure drawings are properly oriented</li>
                <li>Check that text is legible in the images</li>
            </ul>
        </aside>
    </div>

    <footer>
        <hr>
        <p>Powered by {model}</p>
    </footer>

    <script src="/static/compare.js"></script>
</body>
</html>
"##
    ))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
