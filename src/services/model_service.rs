use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::errors::AppResult;

/// One chat-completion call: an optional system instruction plus a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            max_tokens: 4000,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Language model that answers quiz prompts with free text.
///
/// `Ok(None)` means the call succeeded but carried no text. Transport and non-success
/// responses surface as `AppError::UpstreamError`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> AppResult<Option<String>>;
}

/// OpenAI-compatible chat completion client. Pointing `api_base` at OpenRouter works.
pub struct OpenAiQuizModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuizModel {
    pub fn new(api_base: &str, api_key: &SecretString, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key.expose_secret());

        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.user }));

        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl QuizModel for OpenAiQuizModel {
    async fn complete(&self, request: CompletionRequest) -> AppResult<Option<String>> {
        let body = self.request_body(&request);

        let response: Value = self.client.chat().create_byot(body).await?;

        Ok(extract_message_content(&response))
    }
}

/// Pulls `choices[0].message.content` out of a chat completion response.
pub fn extract_message_content(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|content| !content.trim().is_empty())
}
