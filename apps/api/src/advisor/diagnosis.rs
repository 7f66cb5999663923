//! Diagnosis: one JSON-mode model call that scores and critiques a résumé.

use tracing::info;

use crate::advisor::models::DiagnosisResult;
use crate::advisor::prompts::{
    fill_template, DIAGNOSIS_PROMPT_TEMPLATE, DIAGNOSIS_ROLE, DIAGNOSIS_TEMPERATURE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, LANGUAGE_INSTRUCTION};
use crate::llm_client::{CompletionRequest, LlmClient};

/// Builds the diagnosis prompt. Deterministic for a given text.
pub fn build_diagnosis_prompt(resume_text: &str) -> String {
    fill_template(
        DIAGNOSIS_PROMPT_TEMPLATE,
        &[
            ("language_instruction", LANGUAGE_INSTRUCTION),
            ("resume_text", resume_text.trim()),
        ],
    )
}

pub fn diagnosis_system_prompt() -> String {
    format!("{DIAGNOSIS_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Scores and critiques a résumé. Errors are returned as-is; nothing is retried.
pub async fn diagnose_resume(
    resume_text: &str,
    llm: &LlmClient,
) -> Result<DiagnosisResult, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let prompt = build_diagnosis_prompt(resume_text);
    let system = diagnosis_system_prompt();
    let request = CompletionRequest {
        system: &system,
        prompt: &prompt,
        temperature: DIAGNOSIS_TEMPERATURE,
        json_output: true,
    };

    let diagnosis: DiagnosisResult = llm.call_json(&request).await?;
    info!(
        "Diagnosis complete: score={} suggestions={} matched_jobs={}",
        diagnosis.score,
        diagnosis.suggestions.len(),
        diagnosis.matched_jobs.len()
    );
    Ok(diagnosis)
}
