// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment that enforces bare markdown output.
pub const MARKDOWN_ONLY_SYSTEM: &str = "Respond with the markdown document only. \
    Do NOT wrap it in ```markdown code fences. \
    Do NOT add commentary before or after the document.";

/// Instruction keeping generated text faithful to the source résumé.
pub const FIDELITY_INSTRUCTION: &str = "\
    CRITICAL: Keep every fact from the original résumé. Do NOT invent employers, \
    titles, dates, degrees, certifications or metrics. Where a suggestion asks for \
    a number the original does not contain, write a clearly marked placeholder \
    such as [X%] instead of a made-up value.";

/// Instruction to answer in the résumé's own language.
pub const LANGUAGE_INSTRUCTION: &str =
    "Write all free-text values in the same language as the résumé.";
