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
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/analyze/upload",
            post(handlers::handle_analyze_upload),
        )
        .route(
            "/api/v1/analyze/narrative",
            post(handlers::handle_narrative),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::vocabulary::DEFAULT_SKILLS;
    use crate::analysis::MatchEngine;
    use crate::config::Config;
    use crate::llm_client::LlmError;
    use crate::narrative::{NarrativeGenerator, NarrativeRequest};

    const BOUNDARY: &str = "XBOUNDARYX";

    struct EchoSections;

    #[async_trait]
    impl NarrativeGenerator for EchoSections {
        async fn generate(&self, request: &NarrativeRequest<'_>) -> Result<String, LlmError> {
            Ok(format!("sections: {}", request.resume_sections.len()))
        }

        fn backend(&self) -> &'static str {
            "echo"
        }
    }

    fn test_state(narrator: Option<Arc<dyn NarrativeGenerator>>) -> AppState {
        AppState {
            engine: Arc::new(MatchEngine::default()),
            narrator,
            config: Config::from_lookup(|_| None).unwrap(),
        }
    }

    fn app() -> Router {
        build_router(test_state(None))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// (name, optional file name, content)
    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["service"], "resume-analyzer");
        assert_eq!(body["skill_tokens"], DEFAULT_SKILLS.len());
        assert_eq!(body["narrative_backend"], Value::Null);
    }

    #[tokio::test]
    async fn test_health_reports_narrative_backend() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let app = build_router(test_state(Some(Arc::new(EchoSections))));
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narrative_backend"], "echo");
    }

    #[tokio::test]
    async fn test_analyze_json() {
        let request = json_request(
            "/api/v1/analyze",
            json!({"resume_text": "Skills\npython, sql", "jd_text": "Skills\npython, aws"}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["match_percentage"], 50.0);
        assert_eq!(body["report"]["match_strength"], "moderate");
        assert_eq!(body["report"]["feedback"]["rating"], 4);
        assert_eq!(body["report"]["missing_skills"], json!(["aws"]));
        assert_eq!(body["report"]["resume_sections"]["Skills"], "python, sql");
        assert!(body["rendered"]["feedback"]
            .as_str()
            .unwrap()
            .contains("- Add missing skills: aws"));
        assert!(body["analysis_id"].is_string());
        assert!(body["analyzed_at"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_empty_resume_rejected() {
        let request = json_request(
            "/api/v1/analyze",
            json!({"resume_text": "   ", "jd_text": "Skills\npython"}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_empty_jd_allowed() {
        let request = json_request("/api/v1/analyze", json!({"resume_text": "Skills\npython"}));
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["match_percentage"], 0.0);
    }

    #[tokio::test]
    async fn test_upload_text_files() {
        let request = multipart_request(&[
            ("resume", Some("resume.txt"), "Skills\npython, sql\n"),
            ("jd", Some("jd.TXT"), "Skills\npython, aws\n"),
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["match_percentage"], 50.0);
    }

    #[tokio::test]
    async fn test_upload_with_jd_text_field() {
        let request = multipart_request(&[
            ("resume", Some("resume.txt"), "Skills\npython, aws"),
            ("jd_text", None, "Skills\npython, aws"),
            ("note", None, "ignored"),
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["match_percentage"], 100.0);
        assert_eq!(body["report"]["match_strength"], "strong");
    }

    #[tokio::test]
    async fn test_upload_rtf_is_unsupported() {
        let request = multipart_request(&[("resume", Some("resume.rtf"), "{\\rtf1 python}")]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_upload_broken_docx_is_unprocessable() {
        let request = multipart_request(&[("resume", Some("resume.docx"), "PK\u{3}\u{4}")]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Could not read DOCX"));
    }

    #[tokio::test]
    async fn test_upload_broken_pdf_is_unprocessable() {
        let request = multipart_request(&[("resume", Some("resume.pdf"), "%PDF-garbage")]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_upload_missing_resume() {
        let request = multipart_request(&[("jd_text", None, "Skills\npython")]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("resume"));
    }

    #[tokio::test]
    async fn test_narrative_without_backend_is_inline() {
        let request = json_request(
            "/api/v1/analyze/narrative",
            json!({"resume_text": "Skills\npython", "jd_text": "Skills\naws"}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["backend"].is_null());
        assert!(body["narrative"]
            .as_str()
            .unwrap()
            .contains("no narrative backend is configured"));
    }

    #[tokio::test]
    async fn test_narrative_with_backend() {
        let app = build_router(test_state(Some(Arc::new(EchoSections))));
        let request = json_request(
            "/api/v1/analyze/narrative",
            json!({"resume_text": "Skills\npython\nProjects\nparser", "jd_text": ""}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "echo");
        assert_eq!(body["narrative"], "sections: 2");
    }
}
