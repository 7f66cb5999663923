//! Intake: accepts an uploaded résumé and extracts its plain text.
//!
//! Extraction is a single pass through `pdf-extract`. There is no OCR: a
//! scanned PDF without a text layer is rejected with `NoTextLayer`.

pub mod handlers;
#[cfg(test)]
pub mod fixtures;

use std::panic::{self, AssertUnwindSafe};

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Form field names accepted for the uploaded file.
const FILE_FIELDS: [&str; 2] = ["resume", "file"];
/// How far into the file the `%PDF-` marker may appear.
const PDF_HEADER_SCAN: usize = 1024;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("The uploaded file is not a PDF. Please upload a text-based PDF résumé.")]
    NotPdf,

    #[error("The PDF could not be read ({0}). The file may be corrupt; please export a text-based PDF and try again.")]
    Corrupt(String),

    #[error("No text could be extracted. The PDF looks scanned or image-only; please upload a text-based PDF.")]
    NoTextLayer,

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// A file received from the upload form, before extraction.
#[derive(Debug, Clone)]
pub struct Upload {
    pub id: Uuid,
    pub file_name: String,
    pub bytes: Bytes,
}

/// An uploaded résumé with its extracted text. Lives for one request.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub file_name: String,
    pub bytes: Bytes,
    pub text: String,
}

/// Client-facing description of a processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub document_id: Uuid,
    pub file_name: String,
    pub size_bytes: usize,
    pub char_count: usize,
}

impl Document {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            document_id: self.id,
            file_name: self.file_name.clone(),
            size_bytes: self.bytes.len(),
            char_count: self.char_count(),
        }
    }
}

/// Extracts and normalises the text of a PDF held in memory.
pub fn extract_text(bytes: &[u8]) -> Result<String, IntakeError> {
    if !looks_like_pdf(bytes) {
        return Err(IntakeError::NotPdf);
    }

    // pdf-extract panics on some malformed inputs; treat that as corruption.
    let raw = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }))
    .map_err(|payload| IntakeError::Corrupt(panic_message(payload.as_ref())))?
    .map_err(|e| IntakeError::Corrupt(e.to_string()))?;

    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(IntakeError::NoTextLayer);
    }
    Ok(text)
}

/// Runs extraction on the blocking pool and attaches the text to the upload.
pub async fn extract_document(upload: Upload) -> Result<Document, IntakeError> {
    let bytes = upload.bytes.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| IntakeError::Worker(e.to_string()))?;

    match &text {
        Ok(t) => info!(
            document_id = %upload.id,
            chars = t.chars().count(),
            "Extracted text from {}",
            upload.file_name
        ),
        Err(e) => warn!(
            document_id = %upload.id,
            "Extraction failed for {}: {e}",
            upload.file_name
        ),
    }

    Ok(Document {
        id: upload.id,
        file_name: upload.file_name,
        bytes: upload.bytes,
        text: text?,
    })
}

/// Reads the résumé file out of a multipart form.
///
/// Accepts the first `resume` (or `file`) field; other fields are drained.
pub async fn read_upload(multipart: &mut Multipart, max_bytes: usize) -> Result<Upload, AppError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if upload.is_some() || !FILE_FIELDS.contains(&field_name.as_str()) {
            field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_bytes))?;
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().unwrap_or("").to_ascii_lowercase();
        if !file_name.to_ascii_lowercase().ends_with(".pdf") && content_type != "application/pdf" {
            return Err(AppError::UnsupportedFile(format!(
                "'{file_name}' is not a PDF. Only PDF résumés are supported."
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge { limit: max_bytes });
        }
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{file_name}' is empty")));
        }

        debug!("Received upload {file_name} ({} bytes)", bytes.len());
        upload = Some(Upload {
            id: Uuid::new_v4(),
            file_name,
            bytes,
        });
    }

    upload.ok_or_else(|| {
        AppError::Validation(
            "No résumé file was uploaded (expected form field 'resume')".to_string(),
        )
    })
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit: max_bytes }
    } else {
        AppError::Validation(format!("Invalid upload form: {}", err.body_text()))
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(PDF_HEADER_SCAN)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// Line endings unified, trailing whitespace dropped, blank runs capped at one empty line.
fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace(['\r', '\u{000C}'], "\n");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0;
    for line in unified.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            blank_run = 0;
            out.push_str(line);
            out.push('\n');
        }
    }
    out.trim().to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "parser panicked".to_string())
}
