//! Hugging Face inference provider.
//!
//! Talks to the OpenAI-compatible chat completions endpoint of the Hugging
//! Face router. The default model is Phi-4 multimodal, which handles both the
//! translation prompts and image questions.

use async_trait::async_trait;
use grizzly_core::{
    config::HuggingFaceConfig, error::GrizzlyError, message::TranslationOptions,
    traits::LanguageModel,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Hugging Face chat completions client.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_new_tokens: u32,
    temperature: f32,
}

impl HuggingFaceProvider {
    /// Create from config values.
    pub fn from_config(cfg: &HuggingFaceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("huggingface: falling back to default http client: {e}");
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_new_tokens: cfg.max_new_tokens,
            temperature: cfg.temperature,
        }
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_new_tokens,
            temperature: self.temperature,
        }
    }

    async fn complete(&self, body: &ChatCompletionRequest) -> Result<String, GrizzlyError> {
        if self.api_key.is_empty() {
            return Err(GrizzlyError::Provider(
                "huggingface: no API key configured".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let start = Instant::now();
        debug!("huggingface: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GrizzlyError::Provider(format!("huggingface request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GrizzlyError::Provider(format!(
                "huggingface returned {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
            GrizzlyError::Provider(format!("huggingface: failed to parse response: {e}"))
        })?;

        debug!(
            "huggingface: completed in {}ms",
            start.elapsed().as_millis()
        );
        extract_text(parsed)
    }
}

/// Message content: plain text, or a list of text/image parts.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

/// Build the system + user messages for a translation request.
pub(crate) fn translation_messages(text: &str, options: &TranslationOptions) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: MessageContent::Text(options.system_prompt()),
        },
        ChatMessage {
            role: "user",
            content: MessageContent::Text(text.to_string()),
        },
    ]
}

/// Build the single user message carrying an image and a prompt.
pub(crate) fn image_messages(image_url: &str, prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage {
        role: "user",
        content: MessageContent::Parts(vec![
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image_url.to_string(),
                },
            },
            ContentPart::Text {
                text: prompt.to_string(),
            },
        ]),
    }]
}

fn extract_text(parsed: ChatCompletionResponse) -> Result<String, GrizzlyError> {
    parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .map(|t| t.trim().to_string())
        .ok_or_else(|| GrizzlyError::Provider("huggingface: empty response".to_string()))
}

#[async_trait]
impl LanguageModel for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn translate(
        &self,
        text: &str,
        options: &TranslationOptions,
    ) -> Result<String, GrizzlyError> {
        let body = self.request(translation_messages(text, options));
        self.complete(&body).await
    }

    async fn analyze_image(&self, image_url: &str, prompt: &str) -> Result<String, GrizzlyError> {
        let body = self.request(image_messages(image_url, prompt));
        self.complete(&body).await
    }
}
