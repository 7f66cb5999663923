pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::intake::handlers as intake;
use crate::state::AppState;
use crate::ui;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(ui::handle_index))
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(health::status_handler))
        // Intake
        .route("/api/v1/extract", post(intake::handle_extract))
        // Advisor
        .route("/api/v1/diagnosis", post(advisor::handle_diagnose_upload))
        .route("/api/v1/diagnosis/text", post(advisor::handle_diagnose_text))
        .route("/api/v1/resume/optimize", post(advisor::handle_optimize))
        .route("/api/v1/resume/export", post(advisor::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::intake::fixtures::{image_only_pdf, text_pdf};
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::{CompletionBackend, LlmClient, OpenAiCompatBackend};

    const BOUNDARY: &str = "cvdoctor-test-boundary";

    const REPLY_72: &str = r#"{
        "score": 72,
        "score_rationale": "Strong backend depth, few measured outcomes.",
        "summary": "Experienced backend engineer; results need numbers.",
        "pros": ["Production Rust services"],
        "cons": ["No quantified impact"],
        "suggestions": [
            {"advice": "Quantify the latency work", "evidence": "Experienced backend engineer"},
            {"advice": "Add a GitHub link"}
        ],
        "matched_jobs": ["Backend Engineer", "Platform Engineer"]
    }"#;

    fn app_with(backend: Arc<dyn CompletionBackend>, vars: &[(&str, &str)]) -> Router {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        build_router(AppState {
            llm: LlmClient::new(backend),
            config,
        })
    }

    fn multipart_request(
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_upload_page() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("type=\"file\""));
        assert!(html.contains("/api/v1/extract"));
        assert!(html.contains("/api/v1/diagnosis/text"));
        assert!(html.contains("id=\"rendered\""));
    }

    #[tokio::test]
    async fn test_status_reports_configuration() {
        let app = app_with(
            ScriptedBackend::replying(&[]),
            &[("DEEPSEEK_API_KEY", "sk-test"), ("MAX_UPLOAD_BYTES", "2048")],
        );
        let response = app
            .oneshot(Request::get("/api/v1/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["backend"], "scripted");
        assert_eq!(status["api_key_configured"], true);
        assert_eq!(status["max_upload_bytes"], 2048);
    }

    #[tokio::test]
    async fn test_upload_sample_pdf_end_to_end() {
        let backend = ScriptedBackend::replying(&[REPLY_72]);
        let app = app_with(backend.clone(), &[]);
        let pdf = text_pdf(&["Experienced backend engineer", "Rust, Tokio, PostgreSQL"]);

        let response = app
            .oneshot(multipart_request(
                "/api/v1/diagnosis",
                "resume",
                "sample.pdf",
                "application/pdf",
                &pdf,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["resume_text"]
            .as_str()
            .unwrap()
            .contains("Experienced backend engineer"));
        assert_eq!(body["document"]["file_name"], "sample.pdf");
        assert_eq!(body["diagnosis"]["score"], 72);
        assert_eq!(
            body["diagnosis"]["suggestions"][0]["advice"],
            "Quantify the latency work"
        );
        assert_eq!(body["diagnosis"]["suggestions"][1]["advice"], "Add a GitHub link");
        assert_eq!(body["diagnosis"]["strengths"][0], "Production Rust services");

        // The extracted text is what reached the model.
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("Experienced backend engineer"));
    }

    #[tokio::test]
    async fn test_extract_endpoint_reports_char_count() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let pdf = text_pdf(&["Experienced backend engineer"]);
        let response = app
            .oneshot(multipart_request(
                "/api/v1/extract",
                "file",
                "cv.pdf",
                "application/pdf",
                &pdf,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let text = body["text"].as_str().unwrap();
        assert_eq!(body["char_count"], text.chars().count());
    }

    #[tokio::test]
    async fn test_scanned_pdf_is_rejected_without_model_call() {
        let backend = ScriptedBackend::replying(&[REPLY_72]);
        let app = app_with(backend.clone(), &[]);
        let response = app
            .oneshot(multipart_request(
                "/api/v1/diagnosis",
                "resume",
                "scan.pdf",
                "application/pdf",
                &image_only_pdf(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNREADABLE_DOCUMENT");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("text-based PDF"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_unsupported() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(multipart_request(
                "/api/v1/diagnosis",
                "resume",
                "resume.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                b"PK\x03\x04",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_validation_error() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(multipart_request(
                "/api/v1/diagnosis",
                "attachment",
                "sample.pdf",
                "application/pdf",
                &text_pdf(&["x"]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let app = app_with(ScriptedBackend::replying(&[]), &[("MAX_UPLOAD_BYTES", "1024")]);
        let mut data = b"%PDF-1.4\n".to_vec();
        data.resize(4096, b' ');
        let response = app
            .oneshot(multipart_request(
                "/api/v1/diagnosis",
                "resume",
                "big.pdf",
                "application/pdf",
                &data,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_missing_credential_returns_configuration_error() {
        let backend =
            OpenAiCompatBackend::with_base_url(None, "http://unreachable.invalid").unwrap();
        let app = app_with(Arc::new(backend), &[]);
        let response = app
            .oneshot(json_request(
                "/api/v1/diagnosis/text",
                json!({"resume_text": "Experienced backend engineer..."}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("DEEPSEEK_API_KEY"));
    }

    #[tokio::test]
    async fn test_optimize_endpoint_returns_markdown() {
        let backend = ScriptedBackend::replying(&[
            "# Jane Doe\n\n- Cut latency by [X%]\n- GitHub: github.com/jane",
        ]);
        let app = app_with(backend.clone(), &[]);
        let diagnosis: Value = serde_json::from_str(REPLY_72).unwrap();

        let response = app
            .oneshot(json_request(
                "/api/v1/resume/optimize",
                json!({
                    "resume_text": "Jane Doe\nExperienced backend engineer",
                    "diagnosis": diagnosis
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["markdown"].as_str().unwrap().starts_with("# Jane Doe"));
        assert_eq!(body["file_name"], "optimized_resume.md");
        assert!(body["html"].as_str().unwrap().contains("<h1>Jane Doe</h1>"));

        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains("Quantify the latency work"));
        assert!(prompt.contains("Add a GitHub link"));
    }

    #[tokio::test]
    async fn test_quota_error_is_surfaced() {
        let backend = ScriptedBackend::failing(|| crate::llm_client::LlmError::QuotaExceeded {
            status: 402,
            message: "Insufficient Balance".to_string(),
        });
        let app = app_with(backend, &[]);
        let response = app
            .oneshot(json_request(
                "/api/v1/diagnosis/text",
                json!({"resume_text": "Jane Doe"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_json(response).await["error"]["code"], "QUOTA_EXCEEDED");
    }

    #[tokio::test]
    async fn test_export_downloads_markdown() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resume/export")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("markdown=%23+Jane+Doe%0A-+Rust"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"optimized_resume.md\""
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/markdown"));
        assert_eq!(body_text(response).await, "# Jane Doe\n- Rust");
    }

    #[tokio::test]
    async fn test_export_rejects_empty_markdown() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resume/export")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("markdown=+"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_text_diagnosis_without_resume_text_is_validation_error() {
        let backend = ScriptedBackend::replying(&[REPLY_72]);
        let app = app_with(backend.clone(), &[]);
        let response = app
            .oneshot(json_request("/api/v1/diagnosis/text", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("resume_text"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_optimize_with_scoreless_diagnosis_is_validation_error() {
        let backend = ScriptedBackend::replying(&["# Jane Doe"]);
        let app = app_with(backend.clone(), &[]);
        let response = app
            .oneshot(json_request(
                "/api/v1/resume/optimize",
                json!({
                    "resume_text": "Jane Doe",
                    "diagnosis": {"summary": "No score here", "suggestions": []}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("score"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_is_validation_error() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/diagnosis/text")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_normalises_crlf_line_endings() {
        let app = app_with(ScriptedBackend::replying(&[]), &[]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resume/export")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("markdown=%23+Jane+Doe%0D%0A%0D%0A-+Rust%0D%0A"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "# Jane Doe\n\n- Rust\n");
    }
}
