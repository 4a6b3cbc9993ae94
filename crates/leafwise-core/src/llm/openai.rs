//! OpenAI LLM provider using the Chat Completions API.
//!
//! Sends the optional image via data URL in the user message content array.
//! OpenAI-compatible hosts (Hyperbolic) reuse this provider with their own
//! endpoint and name.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::FlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    name: &'static str,
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    /// Whether the endpoint understands `response_format: json_object`
    json_mode: bool,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            name: "openai",
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            json_mode: true,
        }
    }

    /// Create a provider for an OpenAI-compatible host.
    ///
    /// `base_url` is the API root (e.g. `https://api.hyperbolic.xyz/v1`).
    /// Compatible hosts vary in `response_format` support, so JSON mode is
    /// off and the flow's schema instructions carry the format instead.
    pub fn compatible(name: &'static str, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            name,
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            json_mode: false,
        }
    }

    fn build_body(&self, request: &LlmRequest) -> ChatRequest {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            content.push(ChatContent::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            });
        }
        content.push(ChatContent::Text {
            text: request.prompt.clone(),
        });

        ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            response_format: (request.json_output && self.json_mode).then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
        let start = Instant::now();
        let body = self.build_body(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| FlowError::Llm {
                message: format!("{} request failed: {e}", self.name),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(FlowError::Llm {
                message: format!("{} HTTP {status}: {text}", self.name),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| FlowError::Llm {
            message: format!("Failed to parse {} response: {e}", self.name),
            status_code: None,
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| FlowError::Llm {
                message: format!(
                    "{} returned empty choices array, no content generated",
                    self.name
                ),
                status_code: None,
            })?;

        Ok(LlmResponse {
            text: text.trim().to_string(),
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageInput;

    #[test]
    fn test_body_with_image_and_json_mode() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini");
        let mut request =
            LlmRequest::new("Identify").with_image(ImageInput::from_bytes(&[1, 2, 3], "jpeg"));
        request.json_output = true;

        let json = serde_json::to_value(provider.build_body(&request)).unwrap();
        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert!(content[0]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_compatible_host_skips_json_mode() {
        let provider =
            OpenAiProvider::compatible("hyperbolic", "https://example.test/v1/", "key", "qwen");
        assert_eq!(provider.name(), "hyperbolic");
        assert_eq!(provider.endpoint, "https://example.test/v1/chat/completions");
        let mut request = LlmRequest::new("Describe");
        request.json_output = true;

        let json = serde_json::to_value(provider.build_body(&request)).unwrap();
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["content"].as_array().unwrap().len(), 1);
    }
}
