use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::advisor::preview::render_markdown;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;
/// File name offered for the optimized résumé download.
pub const OPTIMIZED_FILE_NAME: &str = "optimized_resume.md";

/// The advisor's scoring and critique of one résumé.
///
/// Deserialization is lenient because it reads model output: `pros`/`cons`
/// are accepted for strengths/weaknesses, missing or null lists are empty,
/// and the score may arrive as a float or string. The score is always
/// clamped into `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score_rationale: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, alias = "pros", deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, alias = "cons", deserialize_with = "null_as_default")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_jobs: Vec<String>,
}

/// One improvement, optionally pinned to the résumé passage it is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SuggestionWire")]
pub struct Suggestion {
    pub advice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionWire {
    Plain(String),
    Detailed {
        #[serde(alias = "suggestion")]
        advice: String,
        #[serde(default)]
        evidence: Option<String>,
    },
}

impl From<SuggestionWire> for Suggestion {
    fn from(wire: SuggestionWire) -> Self {
        match wire {
            SuggestionWire::Plain(advice) => Suggestion {
                advice,
                evidence: None,
            },
            SuggestionWire::Detailed { advice, evidence } => Suggestion {
                advice,
                evidence: evidence
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty()),
            },
        }
    }
}

/// An AI-rewritten résumé in markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedResume {
    pub markdown: String,
    pub html: String,
    pub file_name: String,
}

impl OptimizedResume {
    pub fn new(markdown: String) -> Self {
        Self {
            html: render_markdown(&markdown),
            markdown,
            file_name: OPTIMIZED_FILE_NAME.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreWire {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match ScoreWire::deserialize(deserializer)? {
        ScoreWire::Int(i) => i as f64,
        ScoreWire::Float(f) => f,
        ScoreWire::Text(s) => s
            .trim()
            .trim_end_matches("/100")
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("score '{s}' is not a number")))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom("score is not a finite number"));
    }
    Ok(clamp_score(value))
}

/// Rounds and clamps a raw score into `MIN_SCORE..=MAX_SCORE`.
pub fn clamp_score(raw: f64) -> u8 {
    let clamped = raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64);
    if clamped != raw.round() {
        warn!("Score {raw} out of range, clamped to {clamped}");
    }
    clamped as u8
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
