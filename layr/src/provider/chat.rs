//! Direct cloud chat-completions adapters
//!
//! One client covers the OpenAI-compatible backends (Kimi/Moonshot,
//! DeepSeek, Grok); named constructors supply the per-backend endpoint,
//! default model, and model allowlist. Requests are bearer-authenticated
//! POSTs to `{base}/chat/completions`; the plan text comes back in
//! `choices[0].message.content`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    AiProvider, MAX_INSTRUCTION_CHARS, MAX_SECTION_CHARS, OutputMode, PlanOptions, ProviderError, REFINE_MAX_TOKENS,
    http_client, truncate_chars,
};
use crate::config::ProviderConfig;
use crate::prompts::PromptBuilder;

/// Per-backend constants for the chat-completions wire shape
#[derive(Debug)]
struct Backend {
    name: &'static str,
    base_url: &'static str,
    default_model: &'static str,
    models: &'static [&'static str],
}

static KIMI: Backend = Backend {
    name: "Kimi",
    base_url: "https://api.moonshot.cn/v1",
    default_model: "kimi-k2-0905",
    models: &["kimi-k2-0905", "moonshot-v1-32k", "moonshot-v1-128k"],
};

static DEEPSEEK: Backend = Backend {
    name: "DeepSeek",
    base_url: "https://api.deepseek.com/v1",
    default_model: "deepseek-chat",
    models: &["deepseek-chat", "deepseek-reasoner"],
};

static GROK: Backend = Backend {
    name: "Grok",
    base_url: "https://api.x.ai/v1",
    default_model: "grok-beta",
    models: &["grok-beta", "grok-2-latest"],
};

/// Adapter for OpenAI-compatible cloud backends
pub struct ChatCompletionsProvider {
    backend: &'static Backend,
    model: String,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
    http: Client,
    prompts: PromptBuilder,
}

impl ChatCompletionsProvider {
    /// Moonshot (Kimi) backend
    pub fn kimi(config: &ProviderConfig) -> Self {
        Self::new(&KIMI, config)
    }

    /// DeepSeek backend
    pub fn deepseek(config: &ProviderConfig) -> Self {
        Self::new(&DEEPSEEK, config)
    }

    /// xAI (Grok) backend
    pub fn grok(config: &ProviderConfig) -> Self {
        Self::new(&GROK, config)
    }

    fn new(backend: &'static Backend, config: &ProviderConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_none() {
            warn!(provider = backend.name, "No API key configured; provider will be unavailable");
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| backend.base_url.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            backend,
            model: config.model.clone().unwrap_or_else(|| backend.default_model.to_string()),
            base_url,
            api_key,
            max_tokens: config.max_tokens,
            http: http_client(config.timeout_ms),
            prompts: PromptBuilder::new(),
        }
    }

    fn require_api_key(&self) -> Result<String, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::credentials(
                    self.backend.name,
                    "API key is not configured. Please verify your configuration settings.",
                )
            })
    }

    /// Build the chat-completions request body
    fn build_request_body(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32) -> serde_json::Value {
        debug!(provider = self.backend.name, model = %self.model, max_tokens, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": max_tokens.min(self.max_tokens),
            "temperature": 0.7,
        })
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let api_key = self.require_api_key()?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(system_prompt, user_prompt, max_tokens);

        debug!(provider = self.backend.name, "complete: sending request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(provider = self.backend.name, error = %e, "complete: network error");
                ProviderError::network(self.backend.name, &e)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            // Upstream error bodies go to the debug log, never into the error
            let error_body = response.text().await.unwrap_or_default();
            debug!(provider = self.backend.name, status, body = %error_body, "complete: API error");
            return Err(ProviderError::from_status(self.backend.name, status));
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            debug!(provider = self.backend.name, error = %e, "complete: malformed payload");
            ProviderError::invalid_response(
                self.backend.name,
                "Invalid response format received. This is likely a temporary issue. Please try again shortly.",
            )
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            debug!(provider = self.backend.name, "complete: empty content");
            return Err(ProviderError::EmptyResponse {
                provider: self.backend.name,
            });
        }

        debug!(provider = self.backend.name, content_len = content.len(), "complete: success");
        Ok(content)
    }

    fn prompt_error(&self, error: eyre::Report) -> ProviderError {
        ProviderError::invalid_response(self.backend.name, format!("Failed to build prompt: {}", error))
    }
}

#[async_trait]
impl AiProvider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        self.backend.name
    }

    fn output_mode(&self) -> OutputMode {
        OutputMode::Structured
    }

    fn supported_models(&self) -> &'static [&'static str] {
        self.backend.models
    }

    async fn generate_plan(&self, prompt: &str, options: &PlanOptions) -> Result<String, ProviderError> {
        let system_prompt = self
            .prompts
            .structured_plan(prompt, options)
            .map_err(|e| self.prompt_error(e))?;
        self.complete(&system_prompt, prompt, options.size.max_tokens()).await
    }

    async fn refine_section(
        &self,
        section: &str,
        instruction: &str,
        full_context: &str,
    ) -> Result<String, ProviderError> {
        let section = truncate_chars(section, MAX_SECTION_CHARS);
        let instruction = truncate_chars(instruction, MAX_INSTRUCTION_CHARS);
        let full_context = truncate_chars(full_context, MAX_SECTION_CHARS);

        let system_prompt = self
            .prompts
            .refine(section, instruction, full_context)
            .map_err(|e| self.prompt_error(e))?;
        self.complete(&system_prompt, instruction, REFINE_MAX_TOKENS).await
    }

    async fn validate_api_key(&self, key: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        let url = format!("{}/models", self.base_url);
        match self.http.get(&url).bearer_auth(key).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(provider = self.backend.name, error = %e, "validate_api_key: request failed");
                false
            }
        }
    }

    async fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

// Chat-completions API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}
