// src/parser.rs
//! Decoding of the structured practice-question payload.
//!
//! The model is asked for bare JSON but sometimes wraps it in a markdown code
//! fence. Only a fence that surrounds the whole payload is removed (an opening
//! ```` ``` ```` or ```` ```json ```` line and a closing ```` ``` ````); anything
//! else is handed to the JSON decoder untouched.

use serde::Deserialize;

use crate::error::ApexError;
use crate::models::practice::{PracticeQuestion, OPTION_COUNT};

const FENCE: &str = "```";

/// Wire shape before validation. Every field is optional so a missing one can
/// be reported by name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPracticeQuestion {
    question: Option<String>,
    context: Option<String>,
    options: Option<Vec<String>>,
    correct_index: Option<i64>,
    explanation: Option<String>,
}

/// Remove a code fence that wraps the entire payload.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    // Language tag, if any, runs until the end of the opening line.
    let body = match after_open.find('\n') {
        Some(newline) if is_language_tag(&after_open[..newline]) => &after_open[newline + 1..],
        None if is_language_tag(after_open.trim_end_matches(FENCE)) => "",
        _ => after_open.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

fn is_language_tag(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || tag.eq_ignore_ascii_case("json")
}

pub fn parse_practice_question(raw: &str) -> Result<PracticeQuestion, ApexError> {
    let json = strip_code_fence(raw);

    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        tracing::warn!("Practice question is not valid JSON: {}", e);
        ApexError::malformed(format!("invalid JSON: {}", e))
    })?;

    // serde would also accept a positional array for the struct.
    if !value.is_object() {
        tracing::warn!("Practice question is JSON but not an object");
        return Err(ApexError::malformed("expected a JSON object"));
    }

    let parsed: RawPracticeQuestion = serde_json::from_value(value)
        .map_err(|e| ApexError::malformed(format!("invalid JSON: {}", e)))?;

    let question = parsed
        .question
        .ok_or_else(|| ApexError::malformed("missing field `question`"))?;
    let options = parsed
        .options
        .ok_or_else(|| ApexError::malformed("missing field `options`"))?;
    let correct_index = parsed
        .correct_index
        .ok_or_else(|| ApexError::malformed("missing field `correctIndex`"))?;
    let explanation = parsed
        .explanation
        .ok_or_else(|| ApexError::malformed("missing field `explanation`"))?;

    let option_count = options.len();
    let options: [String; OPTION_COUNT] = options.try_into().map_err(|_| {
        ApexError::malformed(format!(
            "expected {} options, got {}",
            OPTION_COUNT, option_count
        ))
    })?;

    let correct_index = usize::try_from(correct_index)
        .ok()
        .filter(|index| *index < OPTION_COUNT)
        .ok_or_else(|| {
            ApexError::malformed(format!("correctIndex {} out of range", correct_index))
        })?;

    Ok(PracticeQuestion {
        question,
        context: parsed.context,
        options,
        correct_index,
        explanation,
    })
}
