// All LLM prompt constants for the Advisor module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role line for the diagnosis call. JSON-only rules are appended at runtime.
pub const DIAGNOSIS_ROLE: &str = "You are a senior technical interviewer and résumé reviewer. \
    Analyse the résumé you are given and answer strictly with one JSON object.";

/// Diagnosis prompt template.
/// Replace: {language_instruction}, {resume_text}
pub const DIAGNOSIS_PROMPT_TEMPLATE: &str = r#"Review the résumé below and return a JSON object with this EXACT schema:
{
  "score": 0-100 integer,
  "score_rationale": "one sentence explaining why the résumé earned this score",
  "summary": "overall critique in two or three sentences",
  "pros": ["strength 1", "strength 2"],
  "cons": ["weakness 1", "weakness 2"],
  "suggestions": [
    {
      "advice": "a concrete change the candidate should make",
      "evidence": "verbatim quote of the résumé passage the advice is about"
    }
  ],
  "matched_jobs": ["job title 1", "job title 2"]
}

HARD RULES:
1. "score_rationale" is mandatory and must justify the number in one sentence
2. Every suggestion MUST carry "evidence" quoting the original résumé text it refers to
3. Order strengths, weaknesses and suggestions from most to least important
4. "matched_jobs" lists job titles this résumé is competitive for today
5. {language_instruction}

RÉSUMÉ:
{resume_text}"#;

/// Sampling temperature for the diagnosis call.
pub const DIAGNOSIS_TEMPERATURE: f32 = 0.2;

/// Role line for the rewrite call. Markdown-only rules are appended at runtime.
pub const OPTIMIZE_ROLE: &str = "You are a meticulous résumé optimization expert. \
    You rewrite résumés as clean, standard markdown.";

/// Rewrite prompt template.
/// Replace: {resume_text}, {suggestions}, {weaknesses}, {fidelity_instruction},
///          {language_instruction}
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the résumé below into an optimized version using the review that follows.

ORIGINAL RÉSUMÉ:
{resume_text}

SUGGESTIONS TO APPLY (each MUST be reflected in the rewrite):
{suggestions}

WEAKNESSES TO FIX:
{weaknesses}

REQUIREMENTS:
1. Use standard markdown: a level-1 heading with the candidate's name, level-2 headings per section, bullet lists for achievements
2. Apply every suggestion above to the passage its evidence points to
3. Tighten the wording so it reads professionally and concisely
4. {fidelity_instruction}
5. {language_instruction}"#;

/// Sampling temperature for the rewrite call.
pub const OPTIMIZE_TEMPERATURE: f32 = 0.6;

/// Fills `{name}` slots in one left-to-right pass. Inserted values are never
/// rescanned, so model-supplied text containing `{resume_text}` stays literal.
/// Braces that do not name a known slot are copied through.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after.find('}').and_then(|close| {
            let name = &after[..close];
            slots
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match slot {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
