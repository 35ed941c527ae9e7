//! Structured answer extraction from model responses.
//!
//! The model is instructed to wrap its final answer in an `<output>` block
//! containing a single JSON object. Compliance is best-effort, so
//! extraction is an explicit two-stage parser with tagged fallbacks rather
//! than a hard contract.

use serde_json::Value;

/// Opening delimiter of the answer block.
pub const OUTPUT_OPEN: &str = "<output>";

/// Closing delimiter of the answer block.
pub const OUTPUT_CLOSE: &str = "</output>";

/// Answer substituted when the payload parses but carries no answer.
pub const NO_ANSWER_PROVIDED: &str = "No answer provided";

/// Outcome of extracting an answer from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The block parsed as JSON and yielded an answer
    Parsed(String),

    /// The block was present but not valid JSON; its raw text is kept
    RawFallback(String),

    /// No delimited block anywhere in the response
    NotFound,
}

/// Extract the answer from a raw model response.
///
/// Stage one locates the first delimited block (first non-greedy match).
/// Stage two parses its trimmed content as a JSON object with an `answer`
/// field; a missing or empty field yields the literal
/// [`NO_ANSWER_PROVIDED`], and a JSON parse failure keeps the raw block
/// text instead of erroring.
pub fn extract_answer(response: &str) -> Extraction {
    let Some(block) = first_output_block(response) else {
        return Extraction::NotFound;
    };

    let trimmed = block.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(payload) => {
            let answer = payload
                .get("answer")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty());

            match answer {
                Some(answer) => Extraction::Parsed(answer.to_string()),
                None => Extraction::Parsed(NO_ANSWER_PROVIDED.to_string()),
            }
        }
        Err(e) => {
            tracing::error!("Failed to parse JSON output: {}", e);
            Extraction::RawFallback(trimmed.to_string())
        }
    }
}

/// Content of the first `<output>…</output>` pair, if any.
fn first_output_block(response: &str) -> Option<&str> {
    let start = response.find(OUTPUT_OPEN)? + OUTPUT_OPEN.len();
    let end = response[start..].find(OUTPUT_CLOSE)?;
    Some(&response[start..start + end])
}
