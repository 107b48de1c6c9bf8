use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{CompletionProvider, CompletionRequest};
use crate::error::{WordsError, WordsResult};

/// Azure OpenAI deployment settings
#[derive(Debug, Clone)]
pub struct AzureOpenAIConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    /// Deployment name of the chat model
    pub deployment: String,
    pub timeout_secs: u64,
}

impl FromEnv for AzureOpenAIConfig {
    /// Requires GPT_BASE_URL, GPT_API_KEY, GPT_API_VERSION and GPT_MODEL.
    /// GPT_TIMEOUT_SECS defaults to 30.
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = env_or_default("GPT_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| ConfigError::ParseError {
                key: "GPT_TIMEOUT_SECS".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            endpoint: env_required("GPT_BASE_URL")?,
            api_key: env_required("GPT_API_KEY")?,
            api_version: env_required("GPT_API_VERSION")?,
            deployment: env_required("GPT_MODEL")?,
            timeout_secs,
        })
    }
}

/// Chat completions against an Azure OpenAI deployment
pub struct AzureOpenAIProvider {
    client: Client,
    config: AzureOpenAIConfig,
}

impl AzureOpenAIProvider {
    pub fn new(config: AzureOpenAIConfig) -> WordsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WordsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    fn request_body(request: &CompletionRequest) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let mut body = json!({ "messages": messages });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// First choice's content, trimmed. Missing or blank content is malformed.
fn extract_content(response: ChatCompletionResponse) -> WordsResult<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(WordsError::Completion(
            "Completion response contained no content".to_string(),
        ));
    }
    Ok(content)
}

#[async_trait]
impl CompletionProvider for AzureOpenAIProvider {
    async fn complete(&self, request: &CompletionRequest) -> WordsResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("api-key", &self.config.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| WordsError::Completion(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WordsError::Completion(format!(
                "Azure OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| WordsError::Completion(format!("Invalid completion response: {}", e)))?;

        extract_content(completion)
    }
}
