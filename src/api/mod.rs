// src/api/mod.rs — HTTP front end: form pages, JSON analysis, PDF download

pub mod handlers;
pub mod types;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::evaluator::Evaluator;
use crate::infra::config::Config;
use crate::infra::errors::RubrixError;
use crate::report::ReportRenderer;
use upload::UploadStager;

/// Shared state for API handlers. Everything here is read-only after startup.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub evaluator: Arc<Evaluator>,
    pub renderer: Arc<ReportRenderer>,
    pub uploads: Arc<UploadStager>,
}

impl ApiState {
    pub fn new(config: Config, evaluator: Evaluator) -> Result<Self, RubrixError> {
        let uploads = UploadStager::from_config(&config.server);
        Ok(Self {
            config: Arc::new(config),
            evaluator: Arc::new(evaluator),
            renderer: Arc::new(ReportRenderer::new()?),
            uploads: Arc::new(uploads),
        })
    }

    /// State wired to the configured OpenAI-compatible provider.
    pub fn from_config(config: Config) -> Result<Self, RubrixError> {
        let evaluator = Evaluator::from_config(&config.provider)?;
        Self::new(config, evaluator)
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/analyze/upload", post(handlers::analyze_upload))
        .route("/result", get(handlers::result))
        .route("/download-pdf", post(handlers::download_pdf))
        .route("/api/status", get(handlers::api_status))
        .route("/health", get(handlers::health))
        .route("/test-ai", get(handlers::test_ai))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn start_server(host: &str, port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    std::fs::create_dir_all(state.uploads.dir())?;

    let router = build_router(state);

    tracing::info!("Rubrix listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{EvaluationClient, EvaluationSettings};
    use crate::provider::{ChatRequest, ChatResponse, ModelProvider, TokenUsage};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl ModelProvider for CannedProvider {
        fn id(&self) -> &str {
            "canned"
        }
        fn name(&self) -> &str {
            "Canned"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, RubrixError> {
            Ok(ChatResponse {
                content: self.0.to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    const GOOD_REPLY: &str = r#"{"overall_score": 85, "overall_grade": "B", "summary": "Good work"}"#;

    fn test_state(reply: &'static str, upload_dir: &std::path::Path) -> ApiState {
        let mut config = Config::default();
        config.server.upload_dir = upload_dir.to_path_buf();
        let client = EvaluationClient::new(
            Arc::new(CannedProvider(reply)),
            EvaluationSettings::default(),
        );
        ApiState::new(config, Evaluator::new(client)).unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ─── status routes ──────────────────────────────────────────

    #[tokio::test]
    async fn test_health_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["free_models_available"], 4);
        assert_eq!(v["upload_folder_exists"], true);
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["status"], "online");
        assert_eq!(v["ai_provider"], "OpenRouter");
        assert_eq!(v["pdf_generation"], true);
    }

    #[tokio::test]
    async fn test_index_page() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("action=\"/analyze/upload\""));
        assert!(html.contains("name=\"assignment_text\""));
        assert!(html.contains("name=\"rubric_text\""));
        assert!(html.contains("\"/result?\""));
    }

    // ─── analyze ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_analyze_json() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = json_post(
            "/analyze",
            serde_json::json!({"assignment_text": "essay", "rubric_text": "rubric"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["degraded"], false);
        assert_eq!(v["analysis"]["overall_score"], 85);
    }

    #[tokio::test]
    async fn test_analyze_missing_text_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = json_post("/analyze", serde_json::json!({"assignment_text": "essay"}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "Both assignment and rubric text are required");
    }

    #[tokio::test]
    async fn test_analyze_malformed_body_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["error"].as_str().unwrap().starts_with("Invalid request body: "));
    }

    #[tokio::test]
    async fn test_analyze_degraded_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state("not json at all", tmp.path()));
        let req = json_post(
            "/analyze",
            serde_json::json!({"assignment_text": "essay", "rubric_text": "rubric"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["degraded"], true);
        assert_eq!(v["analysis"]["raw_response"], "not json at all");
    }

    // ─── result page ────────────────────────────────────────────

    #[tokio::test]
    async fn test_result_without_analysis() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder().uri("/result").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("No analysis data provided"));
    }

    #[tokio::test]
    async fn test_result_renders_report() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        // {"overall_score":85,"summary":"Fine"}
        let uri = "/result?analysis=%7B%22overall_score%22%3A85%2C%22summary%22%3A%22Fine%22%7D\
                   &assignment_name=essay.txt";
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Fine"));
        assert!(html.contains("essay.txt"));
        assert!(html.contains("Text Input"));
    }

    // ─── download ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_download_pdf_headers() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = json_post(
            "/download-pdf",
            serde_json::json!({"overall_score": 85, "overall_grade": "B", "assignment": "My Essay"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=RUBRIX_Report_My_Essay_85.pdf"
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_download_pdf_bad_report_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = json_post("/download-pdf", serde_json::json!({"overall_score": "85"}));
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["error"]
            .as_str()
            .unwrap()
            .starts_with("PDF generation failed: "));
    }

    // ─── upload ─────────────────────────────────────────────────

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let boundary = "rubrixboundary";
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: text/plain\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        Request::builder()
            .method("POST")
            .uri("/analyze/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_renders_result_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = multipart_request(&[
            ("assignment", Some("essay.txt"), "My essay text"),
            ("rubric", Some("rubric.md"), "Content 100%"),
            ("detailed_analysis", None, "on"),
        ]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Good work"));
        assert!(html.contains("essay.txt"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = multipart_request(&[
            ("assignment", Some("essay.exe"), "x"),
            ("rubric", Some("rubric.txt"), "y"),
        ]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("File type not allowed"));
    }

    #[tokio::test]
    async fn test_upload_missing_rubric() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = multipart_request(&[("assignment", Some("essay.txt"), "x")]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("No files selected"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_self_test_route() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(GOOD_REPLY, tmp.path()));
        let req = Request::builder().uri("/test-ai").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["test_result"]["overall_grade"], "B");
    }
}
