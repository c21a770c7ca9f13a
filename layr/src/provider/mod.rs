//! AI provider abstraction
//!
//! Every backend hides its transport quirks (auth header shape, JSON body
//! shape, error payload shape) behind one small contract so the planner
//! stays backend-agnostic. The set of backends is fixed and closed; the
//! factory is a pure mapping from type name to constructor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod chat;
mod error;
mod ollama;
mod proxy;

pub use chat::ChatCompletionsProvider;
pub use error::{ProviderError, UnsupportedProviderError};
pub use ollama::OllamaProvider;
pub use proxy::GroqProvider;

use crate::config::ProviderConfig;
use crate::domain::GeneratedBy;

/// Maximum characters of section/context content sent for refinement
pub(crate) const MAX_SECTION_CHARS: usize = 50_000;

/// Maximum characters of a refinement instruction
pub(crate) const MAX_INSTRUCTION_CHARS: usize = 2_000;

/// Max tokens requested for a section refinement
pub(crate) const REFINE_MAX_TOKENS: u32 = 4000;

/// Provider type names the factory knows about
pub const SUPPORTED_PROVIDERS: &[&str] = &["groq", "kimi", "deepseek", "grok", "ollama"];

/// How an adapter's generate_plan output is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The adapter contract is "JSON plan": output goes through
    /// extraction, repair, and validation
    Structured,
    /// The adapter contract is "markdown plan": output is wrapped
    /// verbatim as the plan overview
    Freeform,
}

/// Target verbosity tier for a generated plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PlanSize {
    Concise,
    #[default]
    Normal,
    Descriptive,
}

impl PlanSize {
    /// Max-token tier for this size
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Concise => 2500,
            Self::Normal => 5000,
            Self::Descriptive => 8000,
        }
    }

    /// Line budget named in the freeform plan prompt
    pub fn line_budget(self) -> &'static str {
        match self {
            Self::Concise => "EXACTLY 80-100",
            Self::Normal => "EXACTLY 180-240",
            Self::Descriptive => "300+",
        }
    }
}

/// Kind of project a plan is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    Hobby,
    #[default]
    Saas,
    Production,
    Enterprise,
    Prototype,
    OpenSource,
}

/// Request hints that shape the system instructions but not the contract
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlanOptions {
    pub size: PlanSize,
    pub project: ProjectKind,
}

/// The provider contract implemented by every backend adapter
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Display name used in error tags and logs
    fn name(&self) -> &'static str;

    /// Whether this adapter emits a JSON plan or a markdown plan
    fn output_mode(&self) -> OutputMode;

    /// Backend family tag stamped on generated plans
    fn generated_by(&self) -> GeneratedBy {
        GeneratedBy::Ai
    }

    /// Static allowlist of model identifiers this adapter supports
    fn supported_models(&self) -> &'static [&'static str];

    /// Generate a raw plan document for the given project description
    ///
    /// Fails with a tagged [`ProviderError`] on missing credentials,
    /// non-success status, empty body, network failure, or malformed
    /// upstream payload. Transport errors never escape uncategorized.
    async fn generate_plan(&self, prompt: &str, options: &PlanOptions) -> Result<String, ProviderError>;

    /// Refine one section of an existing plan
    ///
    /// Oversized inputs are truncated before transmission to bound
    /// request cost.
    async fn refine_section(
        &self,
        section: &str,
        instruction: &str,
        full_context: &str,
    ) -> Result<String, ProviderError>;

    /// Best-effort credential probe; network failure is `false`, never an error
    async fn validate_api_key(&self, key: &str) -> bool;

    /// Cheap availability check
    async fn is_available(&self) -> bool;
}

/// Create the adapter for a configured provider type name
///
/// Matching is case-insensitive; an unknown name fails with an
/// [`UnsupportedProviderError`] carrying the identifier as configured.
pub fn create_provider(
    type_name: &str,
    config: &ProviderConfig,
) -> Result<Arc<dyn AiProvider>, UnsupportedProviderError> {
    debug!(provider = %type_name, "create_provider: called");
    match type_name.to_lowercase().as_str() {
        "groq" => Ok(Arc::new(GroqProvider::new(config))),
        "kimi" => Ok(Arc::new(ChatCompletionsProvider::kimi(config))),
        "deepseek" => Ok(Arc::new(ChatCompletionsProvider::deepseek(config))),
        "grok" => Ok(Arc::new(ChatCompletionsProvider::grok(config))),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config))),
        other => {
            debug!(provider = %other, "create_provider: unknown provider");
            Err(UnsupportedProviderError(type_name.to_string()))
        }
    }
}

/// Truncate to at most `max` characters on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the HTTP client for an adapter with the configured timeout
pub(crate) fn http_client(timeout_ms: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
