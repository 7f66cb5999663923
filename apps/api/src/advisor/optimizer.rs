//! Optimizer: rewrites a résumé as markdown from its diagnosis.
//!
//! Faithfulness to the original facts is requested in the prompt only;
//! the output is not checked against the source text.

use tracing::{info, warn};

use crate::advisor::models::{DiagnosisResult, OptimizedResume};
use crate::advisor::prompts::{
    fill_template, OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_ROLE, OPTIMIZE_TEMPERATURE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{FIDELITY_INSTRUCTION, LANGUAGE_INSTRUCTION, MARKDOWN_ONLY_SYSTEM};
use crate::llm_client::{strip_markdown_fences, CompletionRequest, LlmClient};

/// Characters of the original résumé sent with the rewrite request.
pub const MAX_SOURCE_CHARS: usize = 2000;

/// Builds the rewrite prompt from the original text and its diagnosis.
pub fn build_optimization_prompt(resume_text: &str, diagnosis: &DiagnosisResult) -> String {
    let source = truncate_chars(resume_text.trim(), MAX_SOURCE_CHARS);

    let suggestions = if diagnosis.suggestions.is_empty() {
        "- (none given; improve clarity and impact throughout)".to_string()
    } else {
        diagnosis
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| match &s.evidence {
                Some(evidence) => {
                    format!("{}. {}\n   Evidence: \"{}\"", i + 1, s.advice, evidence)
                }
                None => format!("{}. {}", i + 1, s.advice),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let weaknesses = if diagnosis.weaknesses.is_empty() {
        "- (none listed)".to_string()
    } else {
        diagnosis
            .weaknesses
            .iter()
            .map(|w| format!("- {w}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    fill_template(
        OPTIMIZE_PROMPT_TEMPLATE,
        &[
            ("fidelity_instruction", FIDELITY_INSTRUCTION),
            ("language_instruction", LANGUAGE_INSTRUCTION),
            ("weaknesses", &weaknesses),
            ("suggestions", &suggestions),
            ("resume_text", source),
        ],
    )
}

pub fn optimization_system_prompt() -> String {
    format!("{OPTIMIZE_ROLE} {MARKDOWN_ONLY_SYSTEM}")
}

/// Requests a rewritten résumé. Errors are returned as-is; nothing is retried.
pub async fn optimize_resume(
    resume_text: &str,
    diagnosis: &DiagnosisResult,
    llm: &LlmClient,
) -> Result<OptimizedResume, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if resume_text.chars().count() > MAX_SOURCE_CHARS {
        warn!(
            "Résumé has {} chars; only the first {MAX_SOURCE_CHARS} are sent for rewriting",
            resume_text.chars().count()
        );
    }

    let prompt = build_optimization_prompt(resume_text, diagnosis);
    let system = optimization_system_prompt();
    let request = CompletionRequest {
        system: &system,
        prompt: &prompt,
        temperature: OPTIMIZE_TEMPERATURE,
        json_output: false,
    };

    let reply = llm.call(&request).await?;
    let markdown = strip_markdown_fences(&reply);
    if markdown.is_empty() {
        return Err(AppError::MalformedResponse(
            "The AI service returned an empty résumé".to_string(),
        ));
    }

    info!("Optimized résumé generated ({} chars)", markdown.chars().count());
    Ok(OptimizedResume::new(markdown.to_string()))
}

/// Returns at most `max` chars of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
