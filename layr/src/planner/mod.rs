//! Plan pipeline
//!
//! Orchestrates plan generation against the configured provider adapter:
//! cache lookup, adapter call, then JSON extraction/repair/validation for
//! structured adapters or verbatim wrapping for freeform adapters, and
//! finally deterministic markdown rendering with the Layr watermark.

pub mod cache;
mod extract;
mod validate;

pub use cache::PlanCache;
pub use extract::{extract_json, parse_json, repair_json};
pub use validate::{DEFAULT_OVERVIEW, DEFAULT_TITLE, plan_from_value};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{EntryKind, FileStructureItem, ProjectPlan};
use crate::provider::{self, AiProvider, OutputMode, PlanOptions, ProviderError, UnsupportedProviderError};

/// Marker identifying a markdown document as generated by this system
///
/// This prefix must stay stable across renderer versions or previously
/// saved plans stop being recognized downstream.
pub const PLAN_WATERMARK: &str = "*Generated by Layr";

/// Title given to plans wrapped from freeform markdown output
pub const FALLBACK_TITLE: &str = "AI Generated Plan";

/// Render the watermark line for a generation time
pub fn format_watermark(at: DateTime<Utc>) -> String {
    format!(
        "{} on {} at {}*",
        PLAN_WATERMARK,
        at.format("%A, %B %-d, %Y"),
        at.format("%-I:%M %p")
    )
}

/// Check whether a markdown document was produced by this system
pub fn is_generated_plan(document: &str) -> bool {
    document.contains(PLAN_WATERMARK)
}

/// The plan-generation pipeline
///
/// Owns the active provider adapter and the plan cache; both are passed
/// in explicitly rather than looked up through globals.
pub struct Planner {
    provider: Arc<dyn AiProvider>,
    cache: Mutex<PlanCache>,
    options: PlanOptions,
}

impl Planner {
    pub fn new(provider: Arc<dyn AiProvider>, cache: PlanCache, options: PlanOptions) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
            options,
        }
    }

    /// Build a planner from configuration, resolving the adapter via the factory
    pub fn from_config(config: &Config) -> Result<Self, UnsupportedProviderError> {
        let provider = provider::create_provider(&config.provider.provider, &config.provider)?;
        let cache = PlanCache::new(config.cache.ttl(), config.cache.capacity);
        Ok(Self::new(provider, cache, config.plan.options()))
    }

    /// The active provider adapter
    pub fn provider(&self) -> &Arc<dyn AiProvider> {
        &self.provider
    }

    /// Generate a canonical plan for a project description
    ///
    /// Adapter errors propagate unchanged; there is no silent fallback
    /// plan. Only response-shape defects after a successful round-trip
    /// are repaired. The cache is written only after full normalization,
    /// so a cancelled call never leaves a partial entry behind.
    pub async fn generate_plan(&self, prompt: &str) -> Result<ProjectPlan, ProviderError> {
        if let Some(plan) = self.lock_cache().get(prompt) {
            info!(provider = self.provider.name(), "generate_plan: cache hit");
            return Ok(plan);
        }

        debug!(provider = self.provider.name(), "generate_plan: cache miss, calling provider");
        let raw = self.provider.generate_plan(prompt, &self.options).await?;

        let mut plan = match self.provider.output_mode() {
            OutputMode::Structured => self.parse_structured(&raw)?,
            OutputMode::Freeform => self.wrap_freeform(&raw),
        };
        plan.generated_at = Utc::now();
        plan.generated_by = self.provider.generated_by();

        self.lock_cache().set(prompt, &plan);
        info!(provider = self.provider.name(), title = %plan.title, "generate_plan: plan generated");
        Ok(plan)
    }

    /// Refine one section of an existing plan
    ///
    /// Uncached passthrough: refinement is context-specific and low-reuse.
    pub async fn refine_section(
        &self,
        section: &str,
        instruction: &str,
        full_context: &str,
    ) -> Result<String, ProviderError> {
        self.provider.refine_section(section, instruction, full_context).await
    }

    /// Render a plan to its canonical markdown document
    pub fn plan_to_markdown(&self, plan: &ProjectPlan) -> String {
        plan_to_markdown(plan)
    }

    fn lock_cache(&self) -> MutexGuard<'_, PlanCache> {
        // The cache holds only disposable copies; after a panic mid-call
        // the surviving state is still usable
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn parse_structured(&self, raw: &str) -> Result<ProjectPlan, ProviderError> {
        let provider = self.provider.name();

        let candidate = extract::extract_json(raw).ok_or_else(|| {
            debug!(raw_len = raw.len(), "parse_structured: no JSON candidate in response");
            ProviderError::invalid_response(
                provider,
                "AI service returned an invalid response format. Try with a simpler project description.",
            )
        })?;

        let value = extract::parse_json(&candidate).map_err(|e| {
            debug!(error = %e, "parse_structured: JSON unparseable after repair");
            ProviderError::invalid_response(
                provider,
                "Failed to parse AI response format. The service may have returned malformed data. \
                 Try again with a clearer project description.",
            )
        })?;

        Ok(validate::plan_from_value(&value, self.provider.generated_by()))
    }

    /// Wrap a markdown document from a freeform adapter as a plan
    fn wrap_freeform(&self, raw: &str) -> ProjectPlan {
        debug!("wrap_freeform: wrapping markdown response as plan overview");
        ProjectPlan::new(FALLBACK_TITLE, raw.trim(), self.provider.generated_by())
    }
}

/// Deterministic renderer from the canonical plan to markdown
///
/// Relied upon by the version-history diff view and by the downstream
/// "is this a generated plan" check, so the layout is stable. A freeform
/// plan whose overview already is a complete watermarked document is
/// emitted verbatim.
pub fn plan_to_markdown(plan: &ProjectPlan) -> String {
    if plan.overview.trim_start().starts_with(PLAN_WATERMARK) {
        return plan.overview.clone();
    }

    let mut md = String::new();
    md.push_str(&format_watermark(plan.generated_at));
    md.push_str("\n\n---\n\n");
    md.push_str(&format!("# {}\n\n", plan.title));

    md.push_str("## Overview\n\n");
    md.push_str(plan.overview.trim());
    md.push_str("\n\n");

    if !plan.requirements.is_empty() {
        md.push_str("## Requirements\n\n");
        for requirement in &plan.requirements {
            md.push_str(&format!("- {}\n", requirement));
        }
        md.push('\n');
    }

    if !plan.file_structure.is_empty() {
        md.push_str("## File Structure\n\n");
        render_file_tree(&mut md, &plan.file_structure, 0);
        md.push('\n');
    }

    if !plan.next_steps.is_empty() {
        md.push_str("## Next Steps\n\n");
        for step in &plan.next_steps {
            let checkbox = if step.completed { "[x]" } else { "[ ]" };
            md.push_str(&format!(
                "- {} **{}** {} ({})",
                checkbox, step.id, step.description, step.priority
            ));
            if let Some(time) = &step.estimated_time {
                md.push_str(&format!(", est. {}", time));
            }
            if !step.dependencies.is_empty() {
                md.push_str(&format!(", depends on: {}", step.dependencies.join(", ")));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    md.push_str(&format!("_Generated by: {}_\n", plan.generated_by));
    md
}

fn render_file_tree(md: &mut String, items: &[FileStructureItem], depth: usize) {
    for item in items {
        let indent = "  ".repeat(depth);
        let label = match item.kind {
            EntryKind::Directory => format!("**{}/**", item.name.trim_end_matches('/')),
            EntryKind::File => format!("`{}`", item.name),
        };
        match &item.description {
            Some(description) => md.push_str(&format!("{}- {}: {}\n", indent, label, description)),
            None => md.push_str(&format!("{}- {}\n", indent, label)),
        }
        if let Some(children) = &item.children {
            render_file_tree(md, children, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedBy;
    use crate::provider::mock::MockProvider;

    const MOCK_PLAN_JSON: &str = r#"{
        "title": "Mock Project",
        "overview": "A mocked project plan",
        "requirements": ["req one", "req two"],
        "fileStructure": [
            {"name": "src", "type": "directory", "path": "src/", "description": "Source"},
            {"name": "package.json", "type": "file", "path": "package.json"}
        ],
        "nextSteps": [
            {"id": "step1", "description": "Setup project", "completed": false, "priority": "high", "estimatedTime": "30 minutes", "dependencies": []}
        ]
    }"#;

    fn planner_with(provider: MockProvider) -> Planner {
        Planner::new(Arc::new(provider), PlanCache::default(), PlanOptions::default())
    }

    #[tokio::test]
    async fn test_generate_plan_structured_end_to_end() {
        let planner = planner_with(MockProvider::structured(vec![MOCK_PLAN_JSON.to_string()]));

        let plan = planner.generate_plan("A React todo app").await.unwrap();
        assert_eq!(plan.title, "Mock Project");
        assert_eq!(plan.generated_by, GeneratedBy::Ai);
        assert_eq!(plan.requirements.len(), 2);
        assert_eq!(plan.file_structure.len(), 2);
        assert_eq!(plan.file_structure[0].name, "src");
        assert_eq!(plan.file_structure[1].name, "package.json");
        assert_eq!(plan.next_steps[0].id, "step1");
    }

    #[tokio::test]
    async fn test_generate_plan_caches_result() {
        let mock = Arc::new(MockProvider::structured(vec![MOCK_PLAN_JSON.to_string()]));
        let planner = Planner::new(mock.clone(), PlanCache::default(), PlanOptions::default());

        let first = planner.generate_plan("A React todo app").await.unwrap();
        // Normalized key: different whitespace/case still hits the cache
        let second = planner.generate_plan("  a react TODO app ").await.unwrap();

        assert_eq!(first.title, second.title);
        assert_eq!(first.overview, second.overview);
        assert_eq!(first.requirements, second.requirements);
        assert_eq!(first.file_structure, second.file_structure);
        assert_eq!(first.next_steps, second.next_steps);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_plan_freeform_wraps_raw_text() {
        let planner = planner_with(MockProvider::freeform(vec!["This is not JSON".to_string()]));

        let plan = planner.generate_plan("anything").await.unwrap();
        assert_eq!(plan.title, FALLBACK_TITLE);
        assert_eq!(plan.overview, "This is not JSON");
        assert!(plan.requirements.is_empty());
        assert!(plan.file_structure.is_empty());
        assert!(plan.next_steps.is_empty());
    }

    #[tokio::test]
    async fn test_generate_plan_structured_garbage_is_an_error() {
        let planner = planner_with(MockProvider::structured(vec!["This is not JSON".to_string()]));

        let err = planner.generate_plan("anything").await.err().expect("should fail");
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
        assert_eq!(err.provider(), "Mock");
    }

    #[tokio::test]
    async fn test_generate_plan_failure_not_cached() {
        let planner = planner_with(MockProvider::structured(vec![
            "garbage".to_string(),
            MOCK_PLAN_JSON.to_string(),
        ]));

        assert!(planner.generate_plan("p").await.is_err());
        // The failed attempt left no cache entry; the retry reaches the adapter
        let plan = planner.generate_plan("p").await.unwrap();
        assert_eq!(plan.title, "Mock Project");
    }

    #[tokio::test]
    async fn test_generate_plan_repairs_malformed_json() {
        let planner = planner_with(MockProvider::structured(vec![
            "{\"title\": \"X\", \"requirements\": [1,2],}".to_string(),
        ]));

        let plan = planner.generate_plan("p").await.unwrap();
        assert_eq!(plan.title, "X");
        assert_eq!(plan.requirements, vec!["1", "2"]);
        assert!(plan.next_steps.is_empty());
    }

    #[tokio::test]
    async fn test_generate_plan_extracts_from_fenced_response() {
        let raw = format!("Here is the plan:\n```json\n{}\n```", MOCK_PLAN_JSON);
        let planner = planner_with(MockProvider::structured(vec![raw]));

        let plan = planner.generate_plan("p").await.unwrap();
        assert_eq!(plan.title, "Mock Project");
    }

    #[tokio::test]
    async fn test_local_provider_tags_plans_ai_local() {
        let planner = planner_with(MockProvider::local(vec![MOCK_PLAN_JSON.to_string()]));

        let plan = planner.generate_plan("p").await.unwrap();
        assert_eq!(plan.generated_by, GeneratedBy::AiLocal);
    }

    #[tokio::test]
    async fn test_adapter_error_propagates_unchanged() {
        let planner = planner_with(MockProvider::structured(vec![]));

        let err = planner.generate_plan("p").await.err().expect("should fail");
        assert_eq!(err.provider(), "Mock");
    }

    #[tokio::test]
    async fn test_refine_section_passthrough() {
        let planner = planner_with(MockProvider::structured(vec!["refined text".to_string()]));

        let refined = planner.refine_section("old", "make better", "full doc").await.unwrap();
        assert_eq!(refined, "refined text");
    }

    #[test]
    fn test_markdown_render_is_watermarked() {
        let mut plan = ProjectPlan::new("My Project", "An overview.", GeneratedBy::Ai);
        plan.requirements = vec!["one".to_string()];

        let md = plan_to_markdown(&plan);
        assert!(md.starts_with(PLAN_WATERMARK));
        assert!(is_generated_plan(&md));
        assert!(md.contains("# My Project"));
        assert!(md.contains("## Requirements"));
        assert!(md.contains("- one"));
    }

    #[test]
    fn test_markdown_render_nested_file_tree() {
        let mut plan = ProjectPlan::new("P", "O", GeneratedBy::Ai);
        plan.file_structure = vec![FileStructureItem {
            name: "src".to_string(),
            kind: EntryKind::Directory,
            path: "src/".to_string(),
            description: Some("Source".to_string()),
            children: Some(vec![FileStructureItem {
                name: "main.rs".to_string(),
                kind: EntryKind::File,
                path: "src/main.rs".to_string(),
                description: None,
                children: None,
            }]),
        }];

        let md = plan_to_markdown(&plan);
        assert!(md.contains("- **src/**: Source"));
        assert!(md.contains("  - `main.rs`"));
    }

    #[test]
    fn test_markdown_render_freeform_document_verbatim() {
        let document = format!("{}\n\n---\n\n# Full Plan\n\nBody", format_watermark(Utc::now()));
        let plan = ProjectPlan::new(FALLBACK_TITLE, document.clone(), GeneratedBy::Ai);

        assert_eq!(plan_to_markdown(&plan), document);
    }

    #[test]
    fn test_markdown_render_is_deterministic() {
        let plan = ProjectPlan::new("P", "O", GeneratedBy::Ai);
        assert_eq!(plan_to_markdown(&plan), plan_to_markdown(&plan));
    }

    #[test]
    fn test_is_generated_plan_rejects_foreign_documents() {
        assert!(!is_generated_plan("# Some other markdown"));
        assert!(is_generated_plan(&format_watermark(Utc::now())));
    }

    #[test]
    fn test_watermark_format() {
        let at = chrono::DateTime::parse_from_rfc3339("2026-08-07T15:04:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let watermark = format_watermark(at);
        assert_eq!(watermark, "*Generated by Layr on Friday, August 7, 2026 at 3:04 PM*");
    }
}
