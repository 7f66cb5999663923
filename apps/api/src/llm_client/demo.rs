//! Canned backend for demo mode (`ADVISOR_DEMO_MODE=true`).
//!
//! Lets the whole upload → diagnosis → rewrite flow run without model
//! access. Replies are fixed and obviously labelled as demo output.

use async_trait::async_trait;

use super::{CompletionBackend, CompletionRequest, LlmError};

const DEMO_DIAGNOSIS: &str = r#"{
  "score": 82,
  "score_rationale": "Demo result: base 70, clear structure +8, relevant stack +4; missing quantified outcomes keeps it below 85.",
  "summary": "Demo mode is on, so this critique is canned. The upload and extraction steps ran for real.",
  "pros": ["Clear section structure", "Relevant technical stack listed up front"],
  "cons": ["Bullets describe duties rather than results", "No links to portfolio or code"],
  "suggestions": [
    {"advice": "Add a measurable outcome to every experience bullet (latency, cost, revenue, users).", "evidence": "Experience bullets describe responsibilities without numbers"},
    {"advice": "Add a GitHub or portfolio link in the header.", "evidence": "Header contains only email and phone"}
  ],
  "matched_jobs": ["Backend Engineer", "Full-Stack Engineer", "Data Engineer"]
}"#;

const DEMO_RESUME: &str = "# Optimized Résumé (Demo)\n\n\
## Contact\n- Name: Your Name\n- Email: you@example.com\n- GitHub: github.com/you\n\n\
## Skills\n- Rust / Tokio / Axum\n- PostgreSQL / Redis\n\n\
## Experience\n- Describe each project with the STAR pattern: situation, task, action, measurable result.\n";

pub struct DemoBackend;

#[async_trait]
impl CompletionBackend for DemoBackend {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        Ok(if request.json_output {
            DEMO_DIAGNOSIS.to_string()
        } else {
            DEMO_RESUME.to_string()
        })
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}
