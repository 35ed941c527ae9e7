//! OpenAI-compatible chat-completions provider.
//!
//! Works against api.openai.com and any backend exposing the same
//! `/v1/chat/completions` surface. Streaming responses arrive as
//! server-sent `data:` lines; a carry buffer handles frames split across
//! network chunks.

use crate::client::{
    ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage,
};
use futures::StreamExt;
use recall_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Non-streaming response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<ApiUsage> for LlmUsage {
    fn from(usage: ApiUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// One streamed chunk body.
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible LLM client.
pub struct OpenAiClient {
    /// Base URL for the API
    base_url: String,

    /// Bearer credential
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client against api.openai.com.
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_OPENAI_URL, api_key)
    }

    /// Create a new client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Convert LlmRequest to the chat-completions format.
    fn to_api_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: request.stream,
        }
    }

    async fn send(&self, api_request: &ChatCompletionRequest<'_>) -> AppResult<reqwest::Response> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(api_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Model API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to {}", self.base_url);
        tracing::debug!("Model: {}, {} messages", request.model, request.messages.len());

        let mut api_request = self.to_api_request(request);
        api_request.stream = false;

        let response = self.send(&api_request).await?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse model response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        tracing::info!("Received completion ({} bytes)", content.len());

        Ok(LlmResponse {
            content,
            model: body.model,
            usage: body.usage.map(LlmUsage::from).unwrap_or_default(),
            done: true,
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        tracing::info!("Starting streaming request to {}", self.base_url);

        let mut api_request = self.to_api_request(request);
        api_request.stream = true;

        let response = self.send(&api_request).await?;

        // Bytes arrive in arbitrary chunk boundaries; carry incomplete
        // lines in a buffer and emit one LlmStreamChunk per data frame.
        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| AppError::Llm(format!("Stream error: {}", e))))
            .scan(String::new(), |buffer, result| {
                let items = match result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        drain_frames(buffer)
                    }
                    Err(e) => vec![Err(e)],
                };
                futures::future::ready(Some(futures::stream::iter(items)))
            })
            .flatten();

        Ok(Box::pin(stream))
    }
}

/// Pull every complete line out of the buffer and parse the data frames.
fn drain_frames(buffer: &mut String) -> Vec<AppResult<LlmStreamChunk>> {
    let mut chunks = Vec::new();

    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        if let Some(chunk) = parse_sse_line(line.trim()) {
            chunks.push(chunk);
        }
    }

    chunks
}

/// Parse one server-sent-events line.
///
/// Returns `None` for non-data lines (blank separators, comments, other
/// fields); `[DONE]` becomes a terminal chunk.
fn parse_sse_line(line: &str) -> Option<AppResult<LlmStreamChunk>> {
    let data = line.strip_prefix("data:")?.trim();

    if data.is_empty() {
        return None;
    }

    if data == "[DONE]" {
        return Some(Ok(LlmStreamChunk {
            content: String::new(),
            model: String::new(),
            done: true,
            usage: None,
        }));
    }

    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => {
            let done = chunk
                .choices
                .first()
                .map(|c| c.finish_reason.is_some())
                .unwrap_or(false);
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta.content)
                .unwrap_or_default();

            Some(Ok(LlmStreamChunk {
                content,
                model: chunk.model,
                done,
                usage: chunk.usage.map(LlmUsage::from),
            }))
        }
        Err(e) => Some(Err(AppError::Llm(format!(
            "Failed to parse stream chunk: {}",
            e
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new("sk-test").unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.base_url, DEFAULT_OPENAI_URL);
    }

    #[test]
    fn test_api_request_conversion() {
        let client = OpenAiClient::new("sk-test").unwrap();
        let request = LlmRequest::new(
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            "gpt-4.1",
        )
        .with_temperature(0.2);

        let api_request = client.to_api_request(&request);
        assert_eq!(api_request.model, "gpt-4.1");
        assert_eq!(api_request.messages.len(), 2);
        assert_eq!(api_request.temperature, Some(0.2));
        assert!(!api_request.stream);

        let json = serde_json::to_value(&api_request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_sse_content_line() {
        let line = r#"data: {"model":"gpt-4.1","choices":[{"delta":{"content":"Hel"}}]}"#;
        let chunk = parse_sse_line(line).unwrap().unwrap();
        assert_eq!(chunk.content, "Hel");
        assert!(!chunk.done);
    }

    #[test]
    fn test_parse_sse_done_marker() {
        let chunk = parse_sse_line("data: [DONE]").unwrap().unwrap();
        assert!(chunk.done);
        assert!(chunk.content.is_empty());
    }

    #[test]
    fn test_parse_sse_finish_reason() {
        let line = r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let chunk = parse_sse_line(line).unwrap().unwrap();
        assert!(chunk.done);
        assert!(chunk.content.is_empty());
    }

    #[test]
    fn test_parse_sse_ignores_non_data_lines() {
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line("event: message").is_none());
    }

    #[test]
    fn test_parse_sse_malformed_json_is_error() {
        let result = parse_sse_line("data: {not json").unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_drain_frames_handles_split_lines() {
        let mut buffer = String::from("data: {\"choices\":[{\"delta\":{\"con");
        assert!(drain_frames(&mut buffer).is_empty());

        // Rest of the frame arrives in the next network chunk
        buffer.push_str("tent\":\"lo\"}}]}\n");
        let chunks = drain_frames(&mut buffer);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().content, "lo");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_frames_multiple_frames_in_order() {
        let mut buffer = String::from(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n",
        );
        let chunks = drain_frames(&mut buffer);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().content, "a");
        assert_eq!(chunks[1].as_ref().unwrap().content, "b");
    }
}
