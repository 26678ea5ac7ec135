//! LLM client — the single point of entry for all model calls in PathFinder.
//!
//! ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
//! All model interactions go through the [`ModelClient`] capability, carried
//! in `AppState` as `Arc<dyn ModelClient>` so tests can swap in a mock.
//!
//! One call per user action, no transport retries, no backoff. The only
//! "retry" anywhere is the raw-text coercion inside roadmap-shaped
//! templates, which never re-hits the network.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in PathFinder.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-opus-5";
const MAX_TOKENS: u32 = 4096;
/// Upper bound on tool-use round trips within one invocation.
const MAX_TOOL_ROUNDS: u32 = 4;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Tool '{0}' failed: {1}")]
    Tool(String, String),

    #[error("Tool loop did not terminate within {MAX_TOOL_ROUNDS} rounds")]
    ToolLoopExceeded,
}

/// A tool declaration passed to the model alongside a prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Executes tool calls the model makes mid-generation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, name: &str, input: &Value) -> Result<Value, LlmError>;
}

/// The model capability the rest of the crate programs against:
/// "generate output from a prompt, optionally invoking declared tools."
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    async fn complete_with_tools(
        &self,
        system: &str,
        prompt: &str,
        tools: &[ToolDef],
        handler: &dyn ToolHandler,
    ) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ApiMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDef]>,
}

#[derive(Debug, Clone, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A response content block, kept symmetric so assistant turns echo back
/// verbatim during the tool loop. Only the fields for the block's `type`
/// are populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ContentBlock {
    fn tool_result(tool_use_id: String, content: String) -> Self {
        Self {
            block_type: "tool_result".to_string(),
            text: None,
            id: None,
            name: None,
            input: None,
            tool_use_id: Some(tool_use_id),
            content: Some(content),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl ApiResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic adapter
// ────────────────────────────────────────────────────────────────────────────

/// Production [`ModelClient`] backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn call(
        &self,
        system: &str,
        messages: &[ApiMessage],
        tools: Option<&[ToolDef]>,
    ) -> Result<ApiResponse, LlmError> {
        let request_body = ApiRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages,
            tools,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            api_response.usage.input_tokens, api_response.usage.output_tokens
        );

        Ok(api_response)
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let messages = [ApiMessage {
            role: "user",
            content: MessageContent::Text(prompt.to_string()),
        }];
        let response = self.call(system, &messages, None).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Runs the synchronous tool loop: every `tool_use` block the model
    /// emits is executed through `handler` and fed back as a `tool_result`
    /// before the response is finalized.
    async fn complete_with_tools(
        &self,
        system: &str,
        prompt: &str,
        tools: &[ToolDef],
        handler: &dyn ToolHandler,
    ) -> Result<String, LlmError> {
        let mut messages = vec![ApiMessage {
            role: "user",
            content: MessageContent::Text(prompt.to_string()),
        }];

        for _round in 0..MAX_TOOL_ROUNDS {
            let response = self.call(system, &messages, Some(tools)).await?;

            if response.stop_reason.as_deref() != Some("tool_use") {
                return response
                    .text()
                    .map(str::to_string)
                    .ok_or(LlmError::EmptyContent);
            }

            let mut results = Vec::new();
            for block in &response.content {
                if block.block_type != "tool_use" {
                    continue;
                }
                let (id, name) = match (&block.id, &block.name) {
                    (Some(id), Some(name)) => (id.clone(), name.clone()),
                    _ => continue,
                };
                let input = block.input.clone().unwrap_or(Value::Null);
                debug!("Executing tool '{name}' for the model");
                let output = handler.call(&name, &input).await?;
                results.push(ContentBlock::tool_result(id, output.to_string()));
            }

            messages.push(ApiMessage {
                role: "assistant",
                content: MessageContent::Blocks(response.content),
            });
            messages.push(ApiMessage {
                role: "user",
                content: MessageContent::Blocks(results),
            });
        }

        Err(LlmError::ToolLoopExceeded)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ────────────────────────────────────────────────────────────────────────────

/// Parses a model reply as JSON after stripping any markdown fences.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Deterministic mock: always returns the same canned reply and counts
    /// invocations.
    pub struct StaticModel {
        pub reply: String,
        pub calls: AtomicU32,
    }

    impl StaticModel {
        pub fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                calls: AtomicU32::new(0),
            }
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for StaticModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }

        async fn complete_with_tools(
            &self,
            _system: &str,
            _prompt: &str,
            _tools: &[ToolDef],
            _handler: &dyn ToolHandler,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    /// Mock that fails every call, for rollback paths.
    pub struct FailingModel;

    #[async_trait]
    impl ModelClient for FailingModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            })
        }

        async fn complete_with_tools(
            &self,
            _system: &str,
            _prompt: &str,
            _tools: &[ToolDef],
            _handler: &dyn ToolHandler,
        ) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            })
        }
    }

    /// Mock that must never be reached — local validation should have
    /// rejected the request first.
    pub struct UnreachableModel;

    #[async_trait]
    impl ModelClient for UnreachableModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            panic!("model invoked although local validation should have failed");
        }

        async fn complete_with_tools(
            &self,
            _system: &str,
            _prompt: &str,
            _tools: &[ToolDef],
            _handler: &dyn ToolHandler,
        ) -> Result<String, LlmError> {
            panic!("model invoked although local validation should have failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_json_through_fences() {
        #[derive(Deserialize)]
        struct Reply {
            response: String,
        }
        let reply: Reply = parse_json("```json\n{\"response\": \"hi\"}\n```").unwrap();
        assert_eq!(reply.response, "hi");
    }

    #[test]
    fn test_tool_result_block_serializes_wire_shape() {
        let block = ContentBlock::tool_result("toolu_123".to_string(), "[]".to_string());
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "tool_result");
        assert_eq!(json["tool_use_id"], "toolu_123");
        assert_eq!(json["content"], "[]");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_tool_use_block_round_trips() {
        let json = r#"{"type":"tool_use","id":"toolu_1","name":"job_listing_lookup","input":{"role":"Data Scientist"}}"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, "tool_use");
        assert_eq!(block.name.as_deref(), Some("job_listing_lookup"));

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["input"]["role"], "Data Scientist");
    }
}
