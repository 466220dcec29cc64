//! Markdown rendering for comparison results
//!
//! The model answers in markdown (headings, bullet lists, change tables).
//! The page shows it formatted; exports keep the raw text.
//!
//! Raw HTML in the model output is never passed through: it is re-emitted
//! as escaped text.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render result text to an HTML fragment
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_renders_as_html_table() {
        let text = "| item | before | after |\n|---|---|---|\n| H-PILE | C.T.C1800 | C.T.C900 |\n";
        let html = render_markdown(text);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>item</th>"));
        assert!(html.contains("<td>C.T.C900</td>"));
    }

    #[test]
    fn test_headings_and_lists() {
        let html = render_markdown("### 1. Location\n- Wall moved 1.5m\n");
        assert!(html.contains("<h3>1. Location</h3>"));
        assert!(html.contains("<li>Wall moved 1.5m</li>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nText with <b>inline</b> tag");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_error_text_stays_readable() {
        let html = render_markdown("Error occurred: Network error: connection refused");
        assert_eq!(
            html,
            "<p>Error occurred: Network error: connection refused</p>\n"
        );
    }
}
