pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/upload", post(handlers::handle_upload))
        .route("/api/v1/results/:job_id", get(handlers::handle_get_results))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::feedback::FeedbackComposer;
    use crate::jobs::InMemoryJobStore;
    use crate::matching::KeywordJobFitScorer;
    use crate::quality::{GrammarEngine, NoopChecker};

    const BOUNDARY: &str = "analyzer-test-boundary";

    const RESUME: &str = "EDUCATION\nBachelor of Science in Computer Science, State University, 2020, GPA 3.8\n\
SKILLS\nPython, Rust, Docker, PostgreSQL, AWS, React, Kubernetes, Terraform, Git, Linux\n\
EXPERIENCE\nSoftware Engineer at Acme Corp 2021 - Present, designed and launched a billing platform used by millions\n\
PROJECTS\nResume Analyzer: built a Rust service that scores resumes and reports feedback to many users\n";

    fn test_state(max_upload_bytes: usize) -> AppState {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.max_upload_bytes = max_upload_bytes;
        let engine = GrammarEngine::new(Arc::new(NoopChecker), 10, Duration::from_secs(1));
        let jobs = Arc::new(InMemoryJobStore::with_ttl(config.job_ttl));
        AppState {
            config,
            composer: FeedbackComposer::new(Arc::new(engine), Duration::from_secs(5)),
            fit_scorer: Arc::new(KeywordJobFitScorer::default()),
            jobs,
        }
    }

    fn multipart_request(filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(1024));
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "analyzer");
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let app = build_router(test_state(1024));
        let body = json!({ "resume_text": RESUME, "include_grammar": false });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["validation"]["has_all_required"], true);
        assert!(json["feedback"]["overall_score"].as_u64().unwrap() > 0);
        assert!(json.get("job_fit").is_none());
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_text() {
        let app = build_router(test_state(1024));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"resume_text":"   "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let app = build_router(test_state(1024));
        let uri = format!("/api/v1/results/{}", uuid::Uuid::new_v4());
        let response = app.oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let app = build_router(test_state(1024));
        let response = app
            .oneshot(multipart_request("resume.docx", b"PK\x03\x04"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let app = build_router(test_state(16));
        let response = app
            .oneshot(multipart_request("resume.txt", RESUME.as_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_then_poll_results() {
        let app = build_router(test_state(64 * 1024));
        let response = app
            .clone()
            .oneshot(multipart_request("resume.txt", RESUME.as_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let accepted = body_json(response).await;
        assert_eq!(accepted["status"], "processing");
        assert_eq!(accepted["filename"], "resume.txt");
        let job_id = accepted["job_id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/results/{job_id}");
        let mut record = Value::Null;
        for _ in 0..100 {
            let response = app.clone().oneshot(get_request(&uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            record = body_json(response).await;
            if record["status"] != "processing" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(record["status"], "completed");
        assert_eq!(record["result"]["validation"]["has_all_required"], true);
    }
}
