//! Layr - AI project planner core
//!
//! Turns a natural-language project description into a structured
//! implementation plan by calling one of several interchangeable AI
//! backends, then caches, renders, and versions the result.
//!
//! # Core Concepts
//!
//! - **One contract, many backends**: every adapter hides its transport
//!   quirks behind the five-operation [`provider::AiProvider`] contract
//! - **Trust nothing upstream**: model output is parsed permissively,
//!   repaired once, then normalized into the canonical plan shape
//! - **Plans are value objects**: the cache and the version store hold
//!   copies, never shared references to live state
//! - **History is best-effort**: version-store failures degrade to
//!   `None`/`false` and never block plan generation
//!
//! # Modules
//!
//! - [`provider`] - provider contract, adapters, and factory
//! - [`planner`] - generation pipeline, cache, extraction, validation
//! - [`prompts`] - embedded Handlebars prompt templates
//! - [`domain`] - canonical plan types
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod planner;
pub mod prompts;
pub mod provider;

// Re-export commonly used types
pub use config::{CacheConfig, Config, HistoryConfig, PlanConfig, ProviderConfig};
pub use domain::{EntryKind, FileStructureItem, GeneratedBy, PlanStep, ProjectPlan, StepPriority};
pub use planner::{PLAN_WATERMARK, PlanCache, Planner, is_generated_plan, plan_to_markdown};
pub use provider::{
    AiProvider, OutputMode, PlanOptions, PlanSize, ProjectKind, ProviderError, SUPPORTED_PROVIDERS,
    UnsupportedProviderError, create_provider,
};
