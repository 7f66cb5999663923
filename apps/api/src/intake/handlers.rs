use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::intake::{extract_document, read_upload, DocumentSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub document: DocumentSummary,
    pub text: String,
}

/// POST /api/v1/extract
///
/// Extraction only: returns the text the advisor would see.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let document = extract_document(upload).await?;

    Ok(Json(ExtractResponse {
        document: document.summary(),
        text: document.text,
    }))
}
