//! Axum route handlers for the Advisor API.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Multipart, State,
    },
    http::header,
    response::IntoResponse,
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisor::diagnosis::diagnose_resume;
use crate::advisor::models::{DiagnosisResult, OPTIMIZED_FILE_NAME};
use crate::advisor::optimizer::optimize_resume;
use crate::errors::AppError;
use crate::intake::{extract_document, read_upload, DocumentSummary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadDiagnosisResponse {
    pub document: DocumentSummary,
    pub resume_text: String,
    pub diagnosis: DiagnosisResult,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TextDiagnosisRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct TextDiagnosisResponse {
    pub diagnosis: DiagnosisResult,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub diagnosis: DiagnosisResult,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub markdown: String,
    /// Rendered preview of `markdown`; raw HTML in the source is escaped.
    pub html: String,
    pub file_name: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    pub markdown: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/diagnosis
///
/// Upload → extract → diagnose, in one request. The extracted text is echoed
/// back so the page can send it with a later rewrite request.
pub async fn handle_diagnose_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadDiagnosisResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let document = extract_document(upload).await?;

    info!(document_id = %document.id, "Diagnosing {}", document.file_name);
    let diagnosis = diagnose_resume(&document.text, &state.llm).await?;

    Ok(Json(UploadDiagnosisResponse {
        document: document.summary(),
        resume_text: document.text,
        diagnosis,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/diagnosis/text
///
/// Diagnoses text that was already extracted (or pasted).
pub async fn handle_diagnose_text(
    State(state): State<AppState>,
    payload: Result<Json<TextDiagnosisRequest>, JsonRejection>,
) -> Result<Json<TextDiagnosisResponse>, AppError> {
    let Json(request) = payload?;
    let diagnosis = diagnose_resume(&request.resume_text, &state.llm).await?;
    Ok(Json(TextDiagnosisResponse {
        diagnosis,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/resume/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let Json(request) = payload?;
    let resume = optimize_resume(&request.resume_text, &request.diagnosis, &state.llm).await?;
    Ok(Json(OptimizeResponse {
        markdown: resume.markdown,
        html: resume.html,
        file_name: resume.file_name,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/resume/export
///
/// Echoes the markdown back as a file download with `\n` line endings.
/// Browsers submit textarea values with CRLF, so those are undone here.
pub async fn handle_export(
    payload: Result<Form<ExportForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = payload?;
    if form.markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown cannot be empty".to_string()));
    }
    let markdown = form.markdown.replace("\r\n", "\n");

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{OPTIMIZED_FILE_NAME}\""),
            ),
        ],
        markdown,
    ))
}
