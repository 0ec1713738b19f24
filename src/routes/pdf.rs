//! PDF conversion endpoints
//!
//! HTTP facade over the shared renderer:
//! - POST /api/pdf/from-file - upload an .html file, receive an A4 PDF
//! - POST /api/pdf/from-html - send raw HTML in a JSON body, receive an A4 PDF
//!
//! Validation happens before the renderer is touched, so rejected
//! requests never cause a browser launch.

use std::path::Path;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Uploads beyond this size are rejected by the body limit layer.
const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Raw HTML conversion request body.
#[derive(Deserialize)]
pub struct HtmlRequest {
    /// Raw HTML string to render as PDF.
    #[serde(default)]
    pub html: String,
}

/// Create the PDF router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/from-file", post(from_file))
        .route("/from-html", post(from_html))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/pdf/from-file
///
/// Upload an HTML file as multipart form data (field name `file`) and
/// receive an A4 PDF in response.
async fn from_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("No file uploaded.".to_string()));
        }

        if !has_html_extension(&file_name) {
            return Err(AppError::BadRequest(
                "Only .html files are accepted.".to_string(),
            ));
        }

        tracing::info!(
            file_name = %file_name,
            size = data.len(),
            "Generating PDF from uploaded file"
        );

        let html = String::from_utf8_lossy(&data);
        let pdf = state.renderer().render_html(&html).await?;

        return pdf_response(pdf, &download_name(&file_name));
    }

    Err(AppError::BadRequest("No file uploaded.".to_string()))
}

/// POST /api/pdf/from-html
///
/// Send raw HTML in the request body and receive an A4 PDF in response.
async fn from_html(
    State(state): State<AppState>,
    Json(request): Json<HtmlRequest>,
) -> Result<Response> {
    if request.html.trim().is_empty() {
        return Err(AppError::BadRequest(
            "HTML content must not be empty.".to_string(),
        ));
    }

    tracing::info!(chars = request.html.len(), "Generating PDF from raw HTML");

    let pdf = state.renderer().render_html(&request.html).await?;

    pdf_response(pdf, "output.pdf")
}

// ============================================================================
// Helpers
// ============================================================================

/// Accepted upload extension check, ASCII case-insensitive.
fn has_html_extension(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".html")
}

/// Derive the download name from the uploaded name: stem + ".pdf".
fn download_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{}.pdf", stem)
}

/// Build the PDF response with download headers.
fn pdf_response(pdf: Vec<u8>, file_name: &str) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, pdf.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Bytes;
    use axum_test::TestServer;
    use serde_json::json;

    const BOUNDARY: &str = "pdfpress-test-boundary";

    fn test_server() -> TestServer {
        let state = AppState::new(Config::default()).unwrap();
        let app = Router::new().nest("/api/pdf", router()).with_state(state);
        TestServer::new(app).unwrap()
    }

    fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Bytes {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: text/html\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Bytes::from(body)
    }

    fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[tokio::test]
    async fn test_from_file_without_file_field() {
        let server = test_server();

        let response = server
            .post("/api/pdf/from-file")
            .content_type(&multipart_content_type())
            .bytes(multipart_body("attachment", "page.html", b"<p>hi</p>"))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("No file uploaded."));
    }

    #[tokio::test]
    async fn test_from_file_empty_file() {
        let server = test_server();

        let response = server
            .post("/api/pdf/from-file")
            .content_type(&multipart_content_type())
            .bytes(multipart_body("file", "page.html", b""))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("No file uploaded."));
    }

    #[tokio::test]
    async fn test_from_file_rejects_non_html_extension() {
        let server = test_server();

        let response = server
            .post("/api/pdf/from-file")
            .content_type(&multipart_content_type())
            .bytes(multipart_body("file", "report.docx", b"<p>hi</p>"))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Only .html files are accepted."));
    }

    #[tokio::test]
    async fn test_from_html_rejects_empty_body() {
        let server = test_server();

        let response = server
            .post("/api/pdf/from-html")
            .json(&json!({ "html": "" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("HTML content must not be empty."));
    }

    #[tokio::test]
    async fn test_from_html_rejects_whitespace_only() {
        let server = test_server();

        let response = server
            .post("/api/pdf/from-html")
            .json(&json!({ "html": "  \n\t " }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_from_html_rejects_missing_field() {
        let server = test_server();

        let response = server.post("/api/pdf/from-html").json(&json!({})).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("HTML content must not be empty."));
    }

    #[test]
    fn test_has_html_extension() {
        assert!(has_html_extension("page.html"));
        assert!(has_html_extension("PAGE.HTML"));
        assert!(has_html_extension("report.final.html"));
        assert!(!has_html_extension("page.htm"));
        assert!(!has_html_extension("page.pdf"));
        assert!(!has_html_extension("html"));
        assert!(!has_html_extension(""));
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("page.html"), "page.pdf");
        assert_eq!(download_name("report.final.html"), "report.final.pdf");
        assert_eq!(download_name(""), "document.pdf");
    }
}
