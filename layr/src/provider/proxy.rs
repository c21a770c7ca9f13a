//! Hosted-proxy adapter (Groq)
//!
//! Routes requests through a trusted intermediary service instead of
//! calling the upstream API directly, so no shared secret ever ships in
//! client code. The indirection preserves the exact same contract and
//! error taxonomy as the direct adapters.
//!
//! Wire shape: POST `{prompt: {systemPrompt, userPrompt}, model, maxTokens}`
//! (no credential), response `{success, content, usage}`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    AiProvider, MAX_INSTRUCTION_CHARS, MAX_SECTION_CHARS, OutputMode, PlanOptions, ProviderError, REFINE_MAX_TOKENS,
    http_client, truncate_chars,
};
use crate::config::ProviderConfig;
use crate::prompts::PromptBuilder;

const PROVIDER_NAME: &str = "Groq";

/// Default intermediary endpoint; overridable via `LAYR_PROXY_URL` or config
pub const DEFAULT_PROXY_URL: &str = "https://layr-api.vercel.app/api/chat";

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const SUPPORTED_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-70b-versatile",
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
];

/// Adapter for the Groq backend, reached via the Layr API proxy
pub struct GroqProvider {
    model: String,
    proxy_url: String,
    http: Client,
    prompts: PromptBuilder,
}

impl GroqProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let proxy_url = std::env::var("LAYR_PROXY_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| config.proxy_url.clone())
            .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());

        debug!(%proxy_url, "GroqProvider: initialized");
        Self {
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            proxy_url,
            http: http_client(config.timeout_ms),
            prompts: PromptBuilder::new(),
        }
    }

    fn require_proxy(&self) -> Result<&str, ProviderError> {
        if self.proxy_url.trim().is_empty() {
            return Err(ProviderError::credentials(
                PROVIDER_NAME,
                "Layr AI backend proxy is not configured. Set LAYR_PROXY_URL or the proxy-url config key.",
            ));
        }
        Ok(&self.proxy_url)
    }

    /// Build the proxy request body; no credential crosses the wire
    fn build_request_body(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32) -> serde_json::Value {
        debug!(model = %self.model, max_tokens, "build_request_body: called");
        serde_json::json!({
            "prompt": {
                "systemPrompt": system_prompt,
                "userPrompt": user_prompt,
            },
            "model": self.model,
            "maxTokens": max_tokens,
        })
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let url = self.require_proxy()?.to_string();
        let body = self.build_request_body(system_prompt, user_prompt, max_tokens);

        debug!("complete: sending request to proxy");
        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            debug!(error = %e, "complete: network error");
            ProviderError::network(PROVIDER_NAME, &e)
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            debug!(status, body = %error_body, "complete: proxy API error");
            return Err(ProviderError::from_status(PROVIDER_NAME, status));
        }

        let proxy_response: ProxyResponse = response.json().await.map_err(|e| {
            debug!(error = %e, "complete: malformed proxy payload");
            ProviderError::invalid_response(
                PROVIDER_NAME,
                "Invalid response format received. This is likely a temporary issue. Please try again shortly.",
            )
        })?;

        if !proxy_response.success {
            debug!("complete: proxy reported failure");
            return Err(ProviderError::invalid_response(
                PROVIDER_NAME,
                "AI service reported a failure. Please try again in a few moments.",
            ));
        }

        let content = proxy_response.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse { provider: PROVIDER_NAME });
        }

        if let Some(usage) = proxy_response.usage {
            debug!(total_tokens = usage.total_tokens, "complete: success");
        }
        Ok(content)
    }

    fn prompt_error(&self, error: eyre::Report) -> ProviderError {
        ProviderError::invalid_response(PROVIDER_NAME, format!("Failed to build prompt: {}", error))
    }
}

#[async_trait]
impl AiProvider for GroqProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn output_mode(&self) -> OutputMode {
        OutputMode::Freeform
    }

    fn supported_models(&self) -> &'static [&'static str] {
        SUPPORTED_MODELS
    }

    async fn generate_plan(&self, prompt: &str, options: &PlanOptions) -> Result<String, ProviderError> {
        let system_prompt = self
            .prompts
            .freeform_plan(options, Utc::now())
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

    async fn validate_api_key(&self, _key: &str) -> bool {
        // Keys live on the proxy, never client-side; the only meaningful
        // check is whether a proxy endpoint is configured
        !self.proxy_url.trim().is_empty()
    }

    async fn is_available(&self) -> bool {
        !self.proxy_url.trim().is_empty()
    }
}

// Proxy API response types

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    usage: Option<ProxyUsage>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ProxyUsage {
    #[serde(default)]
    total_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> GroqProvider {
        GroqProvider {
            model: DEFAULT_MODEL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            http: Client::new(),
            prompts: PromptBuilder::new(),
        }
    }

    #[test]
    fn test_build_request_body_shape() {
        let provider = test_provider();
        let body = provider.build_request_body("system text", "user text", 5000);

        assert_eq!(body["prompt"]["systemPrompt"], "system text");
        assert_eq!(body["prompt"]["userPrompt"], "user text");
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["maxTokens"], 5000);
        // The proxy holds the key; nothing credential-shaped in the body
        assert!(body.get("apiKey").is_none());
        assert!(body.get("authorization").is_none());
    }

    #[test]
    fn test_parse_proxy_response() {
        let json = r##"{"success": true, "content": "# Plan", "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12}}"##;
        let response: ProxyResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.content.as_deref(), Some("# Plan"));
        assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(12));
    }

    #[test]
    fn test_parse_proxy_response_minimal() {
        let response: ProxyResponse = serde_json::from_str(r#"{"content": "x"}"#).unwrap();
        assert!(response.success);
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_unconfigured_proxy_is_credentials_error() {
        let provider = GroqProvider {
            model: DEFAULT_MODEL.to_string(),
            proxy_url: String::new(),
            http: Client::new(),
            prompts: PromptBuilder::new(),
        };
        let err = provider.require_proxy().err().expect("should fail");
        assert!(err.is_credentials());
        assert_eq!(err.provider(), "Groq");
    }

    #[tokio::test]
    async fn test_freeform_mode_and_availability() {
        let provider = test_provider();
        assert_eq!(provider.output_mode(), OutputMode::Freeform);
        assert!(provider.is_available().await);
        assert!(provider.validate_api_key("ignored").await);
    }
}
