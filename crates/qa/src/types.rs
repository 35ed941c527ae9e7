//! Request and response types for the answering pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use recall_core::{AppError, AppResult};
use recall_retrieval::{SearchOptions, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};

/// Answer returned when no usable context was retrieved.
pub const NO_INFORMATION_ANSWER: &str =
    "I couldn't find any relevant information to answer this question.";

/// Answer returned when the generation phase failed.
pub const GENERATION_FAILED_ANSWER: &str =
    "I encountered an error while generating an answer to this question.";

/// An inbound question-answering request.
///
/// Mirrors the wire shape accepted by the route layer. Only `question` is
/// required; unset optional fields fall back to backend defaults.
/// Deserialization is lenient — missing fields become their defaults and
/// [`QaRequest::validate`] rejects what is actually invalid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QaRequest {
    /// The natural-language question
    pub question: String,

    /// Window start, RFC 3339 or `YYYY-MM-DD`
    pub start_time: Option<String>,

    /// Window end, RFC 3339 or `YYYY-MM-DD`
    pub end_time: Option<String>,

    /// Memory space to search
    pub space_id: Option<String>,

    /// Result limit (defaults to 20)
    pub limit: Option<u32>,

    /// Graph traversal depth cap
    pub max_bfs_depth: Option<u32>,

    /// Include invalidated facts
    pub include_invalidated: Option<bool>,

    /// Entity type filter
    pub entity_types: Option<Vec<String>>,

    /// Minimum relevance score
    pub score_threshold: Option<f64>,

    /// Lower bound on result count
    pub min_results: Option<u32>,
}

impl QaRequest {
    /// Create a request with just a question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    /// Check required fields.
    ///
    /// An invalid request is a caller programming error, so this is the one
    /// fault in the pipeline that propagates instead of degrading.
    pub fn validate(&self) -> AppResult<()> {
        if self.question.trim().is_empty() {
            return Err(AppError::Validation(
                "question must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Normalize into backend search options.
    ///
    /// Temporal strings become concrete timestamps; an unparseable one is a
    /// validation fault. The result limit gets its default when absent.
    pub fn to_search_options(&self) -> AppResult<SearchOptions> {
        let start_time = self.start_time.as_deref().map(parse_timestamp).transpose()?;
        let end_time = self.end_time.as_deref().map(parse_timestamp).transpose()?;

        Ok(SearchOptions {
            start_time,
            end_time,
            space_id: self.space_id.clone(),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            max_bfs_depth: self.max_bfs_depth,
            include_invalidated: self.include_invalidated,
            entity_types: self.entity_types.clone(),
            score_threshold: self.score_threshold,
            min_results: self.min_results,
        })
    }
}

/// Accept an RFC 3339 instant or a bare date (read as midnight UTC).
fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AppError::Validation(format!("Invalid timestamp: {}", value)))
}

/// The answering pipeline's terminal output.
///
/// `generated_answer` is always populated — operational failures surface
/// as canned text, never as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResponse {
    /// The question as asked
    pub question: String,

    /// The synthesized (or canned) answer
    pub generated_answer: String,
}

impl QaResponse {
    /// Create a response.
    pub fn new(question: impl Into<String>, generated_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            generated_answer: generated_answer.into(),
        }
    }

    /// Canned response when retrieval produced no usable context.
    pub fn no_information(question: &str) -> Self {
        Self::new(question, NO_INFORMATION_ANSWER)
    }

    /// Canned response when the generation phase failed.
    pub fn generation_failed(question: &str) -> Self {
        Self::new(question, GENERATION_FAILED_ANSWER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_question() {
        let request = QaRequest::new("");
        assert!(matches!(
            request.validate(),
            Err(AppError::Validation(_))
        ));

        let request = QaRequest::new("   ");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_question() {
        let request = QaRequest::new("What color is the car?");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_question_on_the_wire_fails_validation() {
        let request: QaRequest = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let request: QaRequest = serde_json::from_str(
            r#"{
                "question": "what happened?",
                "startTime": "2024-01-01",
                "spaceId": "work",
                "maxBfsDepth": 3,
                "includeInvalidated": true,
                "entityTypes": ["Person"],
                "scoreThreshold": 0.5,
                "minResults": 2
            }"#,
        )
        .unwrap();

        assert_eq!(request.start_time.as_deref(), Some("2024-01-01"));
        assert_eq!(request.space_id.as_deref(), Some("work"));
        assert_eq!(request.max_bfs_depth, Some(3));
        assert_eq!(request.include_invalidated, Some(true));
        assert_eq!(request.score_threshold, Some(0.5));
        assert_eq!(request.min_results, Some(2));
    }

    #[test]
    fn test_options_default_limit() {
        let options = QaRequest::new("q").to_search_options().unwrap();
        assert_eq!(options.limit, 20);

        let request = QaRequest {
            limit: Some(5),
            ..QaRequest::new("q")
        };
        assert_eq!(request.to_search_options().unwrap().limit, 5);
    }

    #[test]
    fn test_options_parse_rfc3339_timestamp() {
        let request = QaRequest {
            start_time: Some("2024-06-01T12:30:00Z".to_string()),
            ..QaRequest::new("q")
        };

        let options = request.to_search_options().unwrap();
        let start = options.start_time.unwrap();
        assert_eq!(start.to_rfc3339(), "2024-06-01T12:30:00+00:00");
    }

    #[test]
    fn test_options_parse_bare_date() {
        let request = QaRequest {
            end_time: Some("2024-01-01".to_string()),
            ..QaRequest::new("q")
        };

        let options = request.to_search_options().unwrap();
        let end = options.end_time.unwrap();
        assert_eq!(end.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_options_reject_invalid_timestamp() {
        let request = QaRequest {
            start_time: Some("next tuesday".to_string()),
            ..QaRequest::new("q")
        };

        assert!(matches!(
            request.to_search_options(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_canned_responses() {
        let response = QaResponse::no_information("q");
        assert_eq!(response.generated_answer, NO_INFORMATION_ANSWER);

        let response = QaResponse::generation_failed("q");
        assert_eq!(response.generated_answer, GENERATION_FAILED_ANSWER);
    }

    #[test]
    fn test_response_serialization() {
        let response = QaResponse::new("What color is the car?", "Red");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["question"], "What color is the car?");
        assert_eq!(json["generated_answer"], "Red");
    }
}
