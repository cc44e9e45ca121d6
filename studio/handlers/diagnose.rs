use std::io::{Cursor, Read};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use tiny_http::{Request, Response, StatusCode};
use tracing::warn;

use leafscan::{DiagnosisResult, Error, SeverityTier, UploadedImage};

use crate::render::{html_escape, render_page};
use crate::state::StudioState;
use crate::util::multipart::{extract_boundary, extract_file_part, MAX_UPLOAD_BYTES};

/// Name of the file input in the upload form.
pub const UPLOAD_FIELD: &str = "leaf_image";

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(render_page(&state.model_path, |tmpl| tmpl))
}

// ---------------------------------------------------------------------------
// POST /diagnose
// ---------------------------------------------------------------------------

pub fn handle_post(request: &mut Request, state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    if request.body_length().is_some_and(|len| len > MAX_UPLOAD_BYTES) {
        return error_page(state, StatusCode(413), &too_large_message());
    }

    let mut body: Vec<u8> = Vec::new();
    let read = request.as_reader()
        .take(MAX_UPLOAD_BYTES as u64 + 1)
        .read_to_end(&mut body);
    if let Err(e) = read {
        return error_page(state, StatusCode(400), &format!("Could not read the upload: {}", e));
    }
    if body.len() > MAX_UPLOAD_BYTES {
        return error_page(state, StatusCode(413), &too_large_message());
    }

    let (status, page) = diagnose_body(&content_type, &body, state);
    crate::routes::html_with_status(status, page)
}

/// Runs the upload in a multipart body through the pipeline and renders the page.
pub fn diagnose_body(content_type: &str, body: &[u8], state: &StudioState) -> (StatusCode, String) {
    let Some(boundary) = extract_boundary(content_type) else {
        return (StatusCode(400), error_html_page(state, "Invalid multipart request."));
    };
    let part = match extract_file_part(body, &boundary, UPLOAD_FIELD) {
        Some(p) if !p.bytes.is_empty() => p,
        _ => return (StatusCode(400), error_html_page(state, "No image file was uploaded.")),
    };

    let upload = UploadedImage::new(part.file_name, part.bytes);
    match state.pipeline.diagnose(&upload) {
        Ok(result) => {
            let preview = preview_html(&upload);
            let card = result_html(&result);
            let page = render_page(&state.model_path, |tmpl| {
                tmpl.replace("{{PREVIEW_SECTION}}", &preview)
                    .replace("{{RESULT_SECTION}}", &card)
            });
            (StatusCode(200), page)
        }
        Err(e) => {
            warn!(error = %e, "diagnosis failed");
            let status = match e {
                Error::Decode(_) => StatusCode(400),
                _ => StatusCode(500),
            };
            (status, error_html_page(state, &e.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Echoes the upload back. The MIME type follows the bytes, since a PNG named
/// `.jpg` still decodes.
fn preview_html(upload: &UploadedImage) -> String {
    let mime = match image::guess_format(&upload.bytes) {
        Ok(ImageFormat::Png) => "image/png",
        _ => "image/jpeg",
    };
    format!(
        r#"<div class="preview"><img src="data:{mime};base64,{data}" alt="Uploaded leaf">
<div class="caption">Uploaded Leaf Image</div></div>"#,
        mime = mime,
        data = STANDARD.encode(&upload.bytes),
    )
}

fn severity_class(severity: SeverityTier) -> &'static str {
    match severity {
        SeverityTier::High => "severity-high",
        SeverityTier::Moderate => "severity-moderate",
        SeverityTier::Low => "severity-low",
    }
}

fn result_html(result: &DiagnosisResult) -> String {
    // The bar shows the whole-number part of the confidence.
    let bar = (result.confidence_percent as u32).min(100);
    format!(
        r#"<hr>
<div class="result-card">
  <h2>Diagnosis Result</h2>
  <h3>{name}</h3>
  <p class="confidence">Confidence: {conf:.2}%</p>
  <p class="severity {sev_class}">Severity: {sev}</p>
  <div class="bar-wrap"><div class="bar-fill" style="width:{bar}%"></div></div>
</div>
<div class="treatment-card">
  <h4>Recommended Treatment</h4>
  <p>{treatment}</p>
</div>"#,
        name      = html_escape(&result.display_name()),
        conf      = result.confidence_percent,
        sev_class = severity_class(result.severity),
        sev       = result.severity,
        bar       = bar,
        treatment = html_escape(&result.treatment),
    )
}

fn error_html(msg: &str) -> String {
    format!(r#"<hr><div class="error-box"><strong>Error:</strong> {}</div>"#, html_escape(msg))
}

fn error_html_page(state: &StudioState, msg: &str) -> String {
    let fragment = error_html(msg);
    render_page(&state.model_path, |tmpl| tmpl.replace("{{RESULT_SECTION}}", &fragment))
}

fn error_page(state: &StudioState, status: StatusCode, msg: &str) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_with_status(status, error_html_page(state, msg))
}

fn too_large_message() -> String {
    format!("Upload exceeds the {} MB limit.", MAX_UPLOAD_BYTES / (1024 * 1024))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use leafscan::{Classifier, DiagnosisPipeline, NormalizedTensor, Result};

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }

        fn output_size(&self) -> usize {
            6
        }
    }

    fn state(output: Vec<f64>) -> StudioState {
        let classifier: Box<dyn Classifier> = Box::new(Fixed(output));
        StudioState::new(DiagnosisPipeline::plant_disease(classifier).unwrap(), "models/test.json")
    }

    fn multipart(file_name: &str, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"--B\r\n");
        out.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"leaf_image\"; filename=\"{}\"\r\n\r\n",
                file_name
            )
            .as_bytes(),
        );
        out.extend_from_slice(data);
        out.extend_from_slice(b"\r\n--B--\r\n");
        out
    }

    fn jpeg_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([60, 140, 50])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageOutputFormat::Jpeg(90)).unwrap();
        buf.into_inner()
    }

    const CT: &str = "multipart/form-data; boundary=B";

    #[test]
    fn successful_upload_renders_result_treatment_and_preview() {
        let st = state(vec![0.01, 0.02, 0.9, 0.01, 0.03, 0.03]);
        let (status, page) = diagnose_body(CT, &multipart("leaf.jpg", &jpeg_bytes()), &st);
        assert_eq!(status, StatusCode(200));
        assert!(page.contains("Apple   Black rot"));
        assert!(page.contains("Confidence: 90.00%"));
        assert!(page.contains("Severity: High Severity"));
        assert!(page.contains("width:90%"));
        assert!(page.contains("Prune infected branches and apply copper-based fungicide."));
        assert!(page.contains("data:image/jpeg;base64,"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn preview_is_labelled_with_the_real_format() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([30, 160, 40])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();

        let st = state(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let (status, page) = diagnose_body(CT, &multipart("leaf.jpg", &buf.into_inner()), &st);
        assert_eq!(status, StatusCode(200));
        assert!(page.contains("data:image/png;base64,"));
        assert!(!page.contains("data:image/jpeg;base64,"));
    }

    #[test]
    fn corrupted_upload_shows_error_and_no_result() {
        let st = state(vec![0.01, 0.02, 0.9, 0.01, 0.03, 0.03]);
        let (status, page) = diagnose_body(CT, &multipart("leaf.png", b"garbage"), &st);
        assert_eq!(status, StatusCode(400));
        assert!(page.contains("Decode error"));
        assert!(!page.contains("result-card\">"));
        assert!(!page.contains("Recommended Treatment"));
    }

    #[test]
    fn malformed_model_output_shows_error_and_no_result() {
        let st = state(vec![0.2; 5]);
        let (status, page) = diagnose_body(CT, &multipart("leaf.jpg", &jpeg_bytes()), &st);
        assert_eq!(status, StatusCode(500));
        assert!(page.contains("Inference error"));
        assert!(!page.contains("Recommended Treatment"));
    }

    #[test]
    fn missing_file_part_is_rejected() {
        let st = state(vec![0.0; 6]);
        let (status, page) = diagnose_body(CT, b"--B--\r\n", &st);
        assert_eq!(status, StatusCode(400));
        assert!(page.contains("No image file was uploaded."));
    }

    #[test]
    fn non_multipart_request_is_rejected() {
        let st = state(vec![0.0; 6]);
        let (status, _) = diagnose_body("application/x-www-form-urlencoded", b"a=b", &st);
        assert_eq!(status, StatusCode(400));
    }
}
