/// Template rendering for the studio page.
///
/// The studio uses a single HTML template (`studio/assets/leafscan.html`) with
/// placeholder tokens like `{{TOKEN}}`. The template is embedded at compile
/// time; `render_page` fills the global tokens and hands the rest to a closure.

use crate::util::multipart::MAX_UPLOAD_BYTES;

const TEMPLATE: &str = include_str!("assets/leafscan.html");

/// Per-request sections; whatever `fill` leaves unfilled renders empty.
const SECTION_TOKENS: [&str; 2] = ["{{PREVIEW_SECTION}}", "{{RESULT_SECTION}}"];

/// Renders the full page.
///
/// - `model_path` shown in the sidebar
/// - `fill`       closure that fills the preview and result placeholders
pub fn render_page<F>(model_path: &str, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{MODEL_PATH}}", &html_escape(model_path));
    html = html.replace("{{MAX_UPLOAD_MB}}", &(MAX_UPLOAD_BYTES / (1024 * 1024)).to_string());

    html = fill(html);

    blank_remaining(html)
}

/// Blanks the section tokens `fill` did not use. Escaped text can never
/// contain a token, so only template placeholders are touched.
fn blank_remaining(mut html: String) -> String {
    for token in SECTION_TOKENS {
        html = html.replace(token, "");
    }
    html
}

/// Escapes markup, and braces so user text cannot form a `{{TOKEN}}`.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
     .replace('{', "&#123;")
     .replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_no_raw_tokens() {
        let html = render_page("models/m.json", |t| t);
        assert!(!html.contains("{{"));
        assert!(html.contains("models/m.json"));
        assert!(html.contains("up to 20 MB"));
    }

    #[test]
    fn fill_closure_substitutes_result() {
        let html = render_page("m", |t| t.replace("{{RESULT_SECTION}}", "<p>done</p>"));
        assert!(html.contains("<p>done</p>"));
    }

    #[test]
    fn braces_in_user_text_survive_rendering() {
        let msg = html_escape("'{{leaf}}.png' is not a readable image");
        let html = render_page("m", |t| t.replace("{{RESULT_SECTION}}", &msg));
        assert!(html.contains("'&#123;&#123;leaf&#125;&#125;.png' is not a readable image"));
    }

    #[test]
    fn model_path_cannot_inject_a_section_token() {
        let html = render_page("models/{{RESULT_SECTION}}.json", |t| {
            t.replace("{{RESULT_SECTION}}", "<p>done</p>")
        });
        assert_eq!(html.matches("<p>done</p>").count(), 1);
        assert!(html.contains("models/&#123;&#123;RESULT_SECTION&#125;&#125;.json"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
