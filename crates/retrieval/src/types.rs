//! Wire types for the knowledge-search backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Default number of results requested per search.
pub const DEFAULT_LIMIT: u32 = 20;

/// Options forwarded to the search backend alongside the query.
///
/// Every field except `limit` is optional; absent fields are omitted from
/// the request payload so the backend applies its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Only consider items valid after this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// Only consider items valid before this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Restrict the search to one memory space
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Maximum number of results (always sent)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Graph traversal depth cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bfs_depth: Option<u32>,

    /// Include facts that have since been invalidated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_invalidated: Option<bool>,

    /// Restrict matches to these entity types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<String>>,

    /// Minimum relevance score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f64>,

    /// Lower bound on the result count the backend should aim for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_results: Option<u32>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            start_time: None,
            end_time: None,
            space_id: None,
            limit: DEFAULT_LIMIT,
            max_bfs_depth: None,
            include_invalidated: None,
            entity_types: None,
            score_threshold: None,
            min_results: None,
        }
    }
}

impl SearchOptions {
    /// Create options with backend defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Restrict the search to a time window.
    pub fn with_time_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Restrict the search to one memory space.
    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    /// Restrict matches to the given entity types.
    pub fn with_entity_types(mut self, entity_types: Vec<String>) -> Self {
        self.entity_types = Some(entity_types);
        self
    }
}

/// A retrieved assertion with its validity timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fact {
    /// The assertion text
    pub fact: String,

    /// When the fact became valid; backends send either a timestamp
    /// string or a raw number, so both are accepted
    #[serde(rename = "validAt", default, deserialize_with = "scalar_to_string")]
    pub valid_at: String,
}

/// Accept any JSON scalar and keep its textual form.
fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Result of one search call.
///
/// Both sequences preserve backend ordering and are empty (never null)
/// when nothing was found or the call failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Pre-formatted contextual text units
    #[serde(default)]
    pub episodes: Vec<String>,

    /// Timestamped assertions
    #[serde(default)]
    pub facts: Vec<Fact>,
}

impl SearchResult {
    /// True when neither episodes nor facts were returned.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty() && self.facts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_serialize_camel_case() {
        let options = SearchOptions::new()
            .with_space("work")
            .with_entity_types(vec!["Person".to_string()]);

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["spaceId"], "work");
        assert_eq!(json["limit"], 20);
        assert_eq!(json["entityTypes"][0], "Person");
        // Absent optionals are omitted entirely
        assert!(json.get("startTime").is_none());
        assert!(json.get("maxBfsDepth").is_none());
        assert!(json.get("scoreThreshold").is_none());
    }

    #[test]
    fn test_options_default_limit() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, DEFAULT_LIMIT);

        // Limit is filled in when missing from a serialized form
        let options: SearchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_fact_accepts_string_valid_at() {
        let fact: Fact =
            serde_json::from_str(r#"{"fact": "The car is red", "validAt": "2024-01-01"}"#).unwrap();
        assert_eq!(fact.fact, "The car is red");
        assert_eq!(fact.valid_at, "2024-01-01");
    }

    #[test]
    fn test_fact_accepts_numeric_valid_at() {
        let fact: Fact =
            serde_json::from_str(r#"{"fact": "The car is red", "validAt": 1704067200}"#).unwrap();
        assert_eq!(fact.valid_at, "1704067200");
    }

    #[test]
    fn test_fact_missing_valid_at() {
        let fact: Fact = serde_json::from_str(r#"{"fact": "The car is red"}"#).unwrap();
        assert_eq!(fact.valid_at, "");
    }

    #[test]
    fn test_search_result_never_null() {
        let result: SearchResult = serde_json::from_str("{}").unwrap();
        assert!(result.is_empty());
        assert!(result.episodes.is_empty());
        assert!(result.facts.is_empty());
    }
}
