pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyses", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analysis::{Analyzer, JOB_URL_WARNING};
    use crate::config::Config;
    use crate::extraction::fixtures::text_pdf;
    use crate::extraction::structural::PdfTextLayer;
    use crate::extraction::TextExtractor;
    use crate::job_description::JobDescriptionSource;
    use crate::llm_client::{Generator, LlmError};

    const BOUNDARY: &str = "X-RESUME-REVIEW-BOUNDARY";

    struct NoJobs;

    #[async_trait]
    impl JobDescriptionSource for NoJobs {
        async fn fetch(&self, _url: &str) -> Option<String> {
            None
        }
    }

    struct CannedGenerator;

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            if prompt.contains("Job Compatibility Analysis") {
                Ok("## Evaluation\n\nSolid.\n\n## Compatibility\n\n70%".to_string())
            } else {
                Ok("## Evaluation\n\nSolid.".to_string())
            }
        }
    }

    fn test_state(upload_dir: &std::path::Path) -> AppState {
        let config = Config {
            google_api_key: "test-key".to_string(),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            generation_timeout_secs: 5,
            job_fetch_timeout_secs: 5,
            job_description_selector: "div.description__text".to_string(),
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            ocr_dpi: 300,
            ocr_lang: "eng".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        };
        let analyzer = Analyzer::new(
            Arc::new(TextExtractor::new(vec![Box::new(PdfTextLayer)])),
            Arc::new(NoJobs),
            Arc::new(CannedGenerator),
        );
        AppState {
            analyzer: Arc::new(analyzer),
            config,
        }
    }

    fn multipart_body(resume: Option<&[u8]>, fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(bytes) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-review-api");
    }

    #[tokio::test]
    async fn test_analyze_without_resume_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(None, &[("job_description", "Requires Go and Rust.")]);

        let response = build_router(test_state(dir.path()))
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_text_resume_with_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = text_pdf(&["Experienced engineer with Python and Go skills."]);
        let body = multipart_body(Some(&pdf), &[("job_description", "Requires Go and Rust.")]);

        let response = build_router(test_state(dir.path()))
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["notice"], handlers::UPLOAD_NOTICE);
        let html = body["analysis_html"].as_str().unwrap();
        assert!(html.contains("<h2>Evaluation</h2>"));
        assert!(html.contains("<h2>Compatibility</h2>"));
        assert!(body["analysis_markdown"]
            .as_str()
            .unwrap()
            .starts_with("## Evaluation"));
        assert!(body.get("warning").is_none());

        // Upload directory is left empty
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_unreadable_resume_with_failed_url() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart_body(
            Some(b"garbage bytes"),
            &[("job_url", "https://www.linkedin.com/jobs/view/1")],
        );

        let response = build_router(test_state(dir.path()))
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "extraction_failed");
        assert!(body.get("analysis_html").is_none());
        assert!(body.get("analysis_markdown").is_none());
        assert!(body["message"].as_str().unwrap().contains("Resume text is required"));
        assert_eq!(body["warning"], JOB_URL_WARNING);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
