//! Google (Gemini) provider

use super::converters::{messages_to_google, tools_to_google};
use super::messages::{LlmMessage, LlmResponse};
use super::parsers::parse_google;
use super::provider::LlmProvider;
use crate::config::ModelConfig;
use crate::error::{ScoutError, ScoutResult};
use crate::tools::ToolSchema;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_ERROR_TEXT_CHARS: usize = 1_024;

/// Gemini `generateContent` client
pub struct GoogleProvider {
    model: String,
    base_url: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    http_client: Client,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GoogleProvider {
    /// Create a provider from the model config; the API key is required
    pub fn new(config: &ModelConfig) -> ScoutResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScoutError::config("Google API key not provided (set GOOGLE_API_KEY)")
            })?;

        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScoutError::llm_with_provider(e.to_string(), "google"))?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(&self, messages: &[LlmMessage], tools: &[ToolSchema]) -> Value {
        let mut request_body = json!({
            "contents": messages_to_google(messages),
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = self.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = self.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if !generation_config.is_empty() {
            request_body["generationConfig"] = Value::Object(generation_config);
        }

        if !tools.is_empty() {
            request_body["tools"] = json!([{
                "functionDeclarations": tools_to_google(tools)
            }]);
        }

        request_body
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    #[instrument(skip(self, messages, tools), fields(model = %self.model), level = "debug")]
    async fn chat(&self, messages: &[LlmMessage], tools: &[ToolSchema]) -> ScoutResult<LlmResponse> {
        let request_body = self.request_body(messages, tools);
        debug!(
            messages = messages.len(),
            tools = tools.len(),
            "Sending Gemini request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                ScoutError::from(e).with_context(format!(
                    "Sending request to Gemini model {}",
                    self.model
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error_text: String = error_text.trim().chars().take(MAX_ERROR_TEXT_CHARS).collect();
            return Err(ScoutError::llm_with_provider(
                format!("Google API error (status {}): {}", status, error_text),
                "google",
            ));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            ScoutError::llm_with_provider(format!("Failed to parse Google response: {}", e), "google")
        })?;

        parse_google(&response_json, &self.model)
    }
}
