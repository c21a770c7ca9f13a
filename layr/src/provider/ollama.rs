//! Locally-hosted model server adapter (Ollama)
//!
//! Talks to an Ollama instance over its generate endpoint with JSON mode
//! enforced; plans from this backend are tagged `ai-local`. No API keys:
//! key validation degrades to a reachability probe.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    AiProvider, MAX_INSTRUCTION_CHARS, MAX_SECTION_CHARS, OutputMode, PlanOptions, ProviderError, http_client,
    truncate_chars,
};
use crate::config::ProviderConfig;
use crate::domain::GeneratedBy;
use crate::prompts::PromptBuilder;

const PROVIDER_NAME: &str = "Ollama";

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

const DEFAULT_MODEL: &str = "llama3";

/// Common local models; users can configure any custom model name
const SUPPORTED_MODELS: &[&str] = &["llama3", "mistral", "codellama", "deepseek-coder"];

/// Context window requested per generation; large plans need the headroom
const NUM_CTX: u32 = 4096;

/// Adapter for a local Ollama server
pub struct OllamaProvider {
    base_url: String,
    model: String,
    http: Client,
    prompts: PromptBuilder,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
        debug!(%base_url, %model, "OllamaProvider: initialized");

        Self {
            base_url,
            model,
            http: http_client(config.timeout_ms),
            prompts: PromptBuilder::new(),
        }
    }

    fn build_request_body(&self, prompt: &str, json_mode: bool) -> serde_json::Value {
        debug!(model = %self.model, json_mode, "build_request_body: called");
        let mut body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.7,
                "num_ctx": NUM_CTX,
            },
        });
        if json_mode {
            body["format"] = serde_json::json!("json");
        }
        body
    }

    async fn generate(&self, prompt: &str, json_mode: bool) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = self.build_request_body(prompt, json_mode);

        debug!("generate: sending request");
        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            debug!(error = %e, "generate: network error");
            ProviderError::network(PROVIDER_NAME, &e)
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            debug!(status, body = %error_body, "generate: API error");
            return Err(ProviderError::from_status(PROVIDER_NAME, status));
        }

        let api_response: OllamaResponse = response.json().await.map_err(|e| {
            debug!(error = %e, "generate: malformed payload");
            ProviderError::invalid_response(
                PROVIDER_NAME,
                "Invalid response format received from the local model server. Please try again.",
            )
        })?;

        if api_response.response.trim().is_empty() {
            return Err(ProviderError::EmptyResponse { provider: PROVIDER_NAME });
        }

        debug!(content_len = api_response.response.len(), "generate: success");
        Ok(api_response.response)
    }

    fn prompt_error(&self, error: eyre::Report) -> ProviderError {
        ProviderError::invalid_response(PROVIDER_NAME, format!("Failed to build prompt: {}", error))
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn output_mode(&self) -> OutputMode {
        OutputMode::Structured
    }

    fn generated_by(&self) -> GeneratedBy {
        GeneratedBy::AiLocal
    }

    fn supported_models(&self) -> &'static [&'static str] {
        SUPPORTED_MODELS
    }

    async fn generate_plan(&self, prompt: &str, options: &PlanOptions) -> Result<String, ProviderError> {
        let system_prompt = self
            .prompts
            .structured_plan(prompt, options)
            .map_err(|e| self.prompt_error(e))?;
        self.generate(&system_prompt, true).await
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
        self.generate(&system_prompt, false).await
    }

    async fn validate_api_key(&self, _key: &str) -> bool {
        // Local instances have no keys; reachability is the whole check
        self.is_available().await
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "is_available: server unreachable");
                false
            }
        }
    }
}

// Ollama API response types

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}
