use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trendcast_common::{Result, TrendcastError};

use crate::client::{LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: Option<String>, model: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    /// Bound every request by `timeout`. Falls back to the default client if
    /// the builder rejects the configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => self.http_client = client,
            Err(e) => tracing::warn!(error = %e, "Could not apply HTTP timeout"),
        }
        self
    }

    fn role_str(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    fn build_body<'a>(&'a self, request: &'a LlmRequest) -> ChatCompletionBody<'a> {
        let system = request.system_prompt.as_deref().map(|content| WireMessage {
            role: "system",
            content,
        });
        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(|m| WireMessage {
                role: Self::role_str(m.role),
                content: &m.content,
            }))
            .collect();

        ChatCompletionBody {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_body(&request);

        let mut http_req = self.http_client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            http_req = http_req.bearer_auth(key);
        }

        let response = http_req
            .send()
            .await
            .map_err(|e| TrendcastError::Generation(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let mut body_text = response.text().await.unwrap_or_default();
            if let Some(secs) = retry_after {
                body_text = format!("{body_text} (Retry-After: {secs})");
            }
            return Err(TrendcastError::Provider {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            TrendcastError::Generation(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TrendcastError::Generation("No choices in OpenAI response".into()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            model: completion.model,
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;

    #[test]
    fn body_places_system_prompt_first() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), Some("sk-test".to_string()));
        let request = LlmRequest {
            system_prompt: Some("Be concise.".to_string()),
            messages: vec![ChatMessage::user("Three trends please")],
            temperature: Some(0.5),
            max_tokens: Some(4000),
        };

        let json = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 4000);

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be concise.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Three trends please");
    }

    #[test]
    fn body_omits_unset_options() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), None);
        let request = LlmRequest::from_prompt("Hello");

        let json = serde_json::to_value(client.build_body(&request)).unwrap();

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn base_url_defaults_and_drops_trailing_slash() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), None);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);

        let client = OpenAiClient::new(
            Some("http://localhost:11434/".to_string()),
            "llama3".to_string(),
            None,
        );
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model_name(), "llama3");
    }

    #[test]
    fn completion_with_null_content_parses() {
        let raw = r#"{
            "model": "gpt-4o",
            "choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "length"}]
        }"#;
        let parsed: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert!(parsed.choices[0].message.content.is_none());
        assert!(parsed.usage.is_none());
    }
}
