// src/api/handlers.rs

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::api::upload::StagedUpload;
use crate::api::{types::*, ApiState};
use crate::evaluator::{AnalysisOptions, SAMPLE_ASSIGNMENT, SAMPLE_RUBRIC};
use crate::infra::errors::RubrixError;
use crate::report::{pdf_filename, Format, RenderContext, Report};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: &RubrixError) -> ApiError {
    let status = if e.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// A request body that is not the expected JSON, in the same error shape
/// as every other API failure.
fn rejected_body(context: &str, rejection: JsonRejection) -> ApiError {
    let message = rejection.body_text();
    tracing::warn!(status = %rejection.status(), "{context}: {message}");
    (
        rejection.status(),
        Json(ErrorResponse::new(format!("{context}: {message}"))),
    )
}

/// The upload form with an error banner, or a bare 500 if even that fails.
fn index_page(state: &ApiState, status: StatusCode, error: Option<&str>) -> Response {
    match state
        .renderer
        .html()
        .render_index(error, state.uploads.allowed_extensions())
    {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render index page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Stamp the report and render the result page.
fn result_page(state: &ApiState, mut report: Report, ctx: RenderContext) -> Response {
    report.stamp(ctx.generated_at);
    match state.renderer.html().render_report(&report, &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render result page: {e}");
            index_page(
                state,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&format!("Error displaying results: {e}")),
            )
        }
    }
}

/// GET / — Upload form.
pub async fn index(State(state): State<ApiState>) -> Response {
    index_page(&state, StatusCode::OK, None)
}

/// POST /analyze — Evaluate inline text, answer with the Report as JSON.
pub async fn analyze(
    State(state): State<ApiState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(body) = body.map_err(|r| rejected_body("Invalid request body", r))?;
    let verdict = state
        .evaluator
        .analyze(&body.assignment_text, &body.rubric_text, &body.options)
        .await
        .map_err(|e| api_error(&e))?;

    let degraded = verdict.is_degraded();
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: verdict.into_report(),
        degraded,
    }))
}

/// Uploaded form contents after staging.
struct UploadForm {
    assignment: Option<StagedUpload>,
    rubric: Option<StagedUpload>,
    options: AnalysisOptions,
}

async fn read_upload_form(
    state: &ApiState,
    mut multipart: Multipart,
) -> Result<UploadForm, RubrixError> {
    let mut form = UploadForm {
        assignment: None,
        rubric: None,
        // Unchecked checkboxes are simply absent from the form.
        options: AnalysisOptions {
            detailed_analysis: false,
            rewrite_suggestions: false,
            grade_prediction: false,
        },
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RubrixError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "assignment" | "rubric" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RubrixError::Upload(e.to_string()))?;
                let staged = state.uploads.stage(&filename, &bytes)?;
                if name == "assignment" {
                    form.assignment = Some(staged);
                } else {
                    form.rubric = Some(staged);
                }
            }
            "detailed_analysis" => form.options.detailed_analysis = true,
            "rewrite_suggestions" => form.options.rewrite_suggestions = true,
            "grade_prediction" => form.options.grade_prediction = true,
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }
    Ok(form)
}

/// POST /analyze/upload — Evaluate two uploaded files, answer with the
/// result page.
pub async fn analyze_upload(State(state): State<ApiState>, multipart: Multipart) -> Response {
    let form = match read_upload_form(&state, multipart).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Upload rejected: {e}");
            return index_page(&state, StatusCode::BAD_REQUEST, Some(&e.to_string()));
        }
    };

    let (Some(assignment), Some(rubric)) = (form.assignment, form.rubric) else {
        return index_page(&state, StatusCode::BAD_REQUEST, Some("No files selected"));
    };

    let texts = assignment
        .read_text()
        .and_then(|a| rubric.read_text().map(|r| (a, r)));
    let (assignment_text, rubric_text) = match texts {
        Ok(t) => t,
        Err(e) => {
            return index_page(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&format!("Error: {e}")),
            )
        }
    };

    let verdict = match state
        .evaluator
        .analyze(&assignment_text, &rubric_text, &form.options)
        .await
    {
        Ok(v) => v,
        Err(e) => return index_page(&state, StatusCode::BAD_REQUEST, Some(&e.to_string())),
    };

    let ctx = RenderContext::new(assignment.original_name(), rubric.original_name());
    // Staged files are removed here whether or not rendering succeeds.
    drop(assignment);
    drop(rubric);
    result_page(&state, verdict.into_report(), ctx)
}

/// GET /result — Render a Report passed as JSON in the query string.
pub async fn result(State(state): State<ApiState>, Query(query): Query<ResultQuery>) -> Response {
    let Some(raw) = query.analysis.filter(|a| !a.trim().is_empty()) else {
        return index_page(
            &state,
            StatusCode::BAD_REQUEST,
            Some("No analysis data provided"),
        );
    };

    let report: Report = match serde_json::from_str(&raw) {
        Ok(r) => r,
        Err(e) => {
            return index_page(
                &state,
                StatusCode::BAD_REQUEST,
                Some(&format!("Error displaying results: {e}")),
            )
        }
    };

    let ctx = RenderContext::new(
        query.assignment_name.unwrap_or_else(|| "Text Input".into()),
        query.rubric_name.unwrap_or_else(|| "Text Input".into()),
    );
    result_page(&state, report, ctx)
}

/// POST /download-pdf — Render a Report as a PDF attachment.
pub async fn download_pdf(
    State(state): State<ApiState>,
    body: Result<Json<PdfRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(PdfRequest {
        mut report,
        assignment,
        rubric,
    }) = body.map_err(|r| rejected_body("PDF generation failed", r))?;

    let ctx = RenderContext::new(
        assignment.unwrap_or_else(|| "N/A".into()),
        rubric.unwrap_or_else(|| "N/A".into()),
    );
    report.stamp(ctx.generated_at);

    let doc = state
        .renderer
        .render(&report, &ctx, Format::Pdf)
        .map_err(|e| {
            tracing::error!("PDF generation failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("PDF generation failed: {e}"))),
            )
        })?;

    let filename = pdf_filename(&ctx.assignment_name, report.overall_score);
    tracing::info!(file = %filename, "Generated PDF report");

    Ok((
        [
            (header::CONTENT_TYPE, doc.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        doc.into_bytes(),
    )
        .into_response())
}

/// GET /api/status — Static service facts.
pub async fn api_status(State(state): State<ApiState>) -> Json<ServiceStatus> {
    let provider = &state.config.provider;
    Json(ServiceStatus {
        status: "online".into(),
        service: "RUBRIX AI Assignment Evaluator".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        ai_provider: provider.name.clone(),
        model: provider.model.clone(),
        free_models_available: provider.models.len(),
        api_key_configured: provider.has_api_key(),
        strict_evaluation_mode: true,
        pdf_generation: true,
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

/// GET /health — Liveness plus a few cheap checks.
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        ai_provider: state.config.provider.name.clone(),
        free_models_available: state.config.provider.models.len(),
        upload_folder_exists: state.uploads.dir().is_dir(),
        pdf_generation: true,
    })
}

/// GET /test-ai — Run the built-in sample through the full pipeline.
pub async fn test_ai(State(state): State<ApiState>) -> Result<Json<SelfTestResponse>, ApiError> {
    let verdict = state
        .evaluator
        .analyze(SAMPLE_ASSIGNMENT, SAMPLE_RUBRIC, &AnalysisOptions::default())
        .await
        .map_err(|e| api_error(&e))?;

    let degraded = verdict.is_degraded();
    Ok(Json(SelfTestResponse {
        success: true,
        strict_mode: true,
        degraded,
        test_result: verdict.into_report(),
    }))
}
