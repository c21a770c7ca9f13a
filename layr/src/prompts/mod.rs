//! Prompt construction
//!
//! Embedded Handlebars templates rendered with a size tier and project
//! kind filled in. Adapters own a [`PromptBuilder`] and build their
//! system prompts through it; the hints change the instructions, never
//! the contract shape.

use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

mod embedded;

use crate::planner::format_watermark;
use crate::provider::{PlanOptions, PlanSize, ProjectKind};

/// Context for rendering the structured plan template
#[derive(Debug, Serialize)]
struct StructuredPlanContext<'a> {
    request: &'a str,
    size_instructions: &'static str,
    type_instructions: &'static str,
}

/// Context for rendering the freeform plan template
#[derive(Debug, Serialize)]
struct FreeformPlanContext {
    size_instructions: &'static str,
    type_instructions: &'static str,
    watermark: String,
    line_budget: &'static str,
}

/// Context for rendering the refine template
#[derive(Debug, Serialize)]
struct RefineContext<'a> {
    section: &'a str,
    instruction: &'a str,
    context: &'a str,
}

fn size_instructions(size: PlanSize) -> &'static str {
    match size {
        PlanSize::Concise => embedded::SIZE_CONCISE,
        PlanSize::Normal => embedded::SIZE_NORMAL,
        PlanSize::Descriptive => embedded::SIZE_DESCRIPTIVE,
    }
}

fn type_instructions(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Hobby => embedded::TYPE_HOBBY,
        ProjectKind::Saas => embedded::TYPE_SAAS,
        ProjectKind::Production => embedded::TYPE_PRODUCTION,
        ProjectKind::Enterprise => embedded::TYPE_ENTERPRISE,
        ProjectKind::Prototype => embedded::TYPE_PROTOTYPE,
        ProjectKind::OpenSource => embedded::TYPE_OPEN_SOURCE,
    }
}

/// Renders embedded prompt templates
pub struct PromptBuilder {
    hbs: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// System prompt asking for a JSON plan
    pub fn structured_plan(&self, request: &str, options: &PlanOptions) -> Result<String> {
        self.render(
            "structured-plan",
            &StructuredPlanContext {
                request,
                size_instructions: size_instructions(options.size),
                type_instructions: type_instructions(options.project),
            },
        )
    }

    /// System prompt asking for a watermarked markdown plan document
    pub fn freeform_plan(&self, options: &PlanOptions, at: DateTime<Utc>) -> Result<String> {
        self.render(
            "freeform-plan",
            &FreeformPlanContext {
                size_instructions: size_instructions(options.size),
                type_instructions: type_instructions(options.project),
                watermark: format_watermark(at),
                line_budget: options.size.line_budget(),
            },
        )
    }

    /// System prompt for refining one section of a plan
    pub fn refine(&self, section: &str, instruction: &str, context: &str) -> Result<String> {
        self.render(
            "refine-section",
            &RefineContext {
                section,
                instruction,
                context,
            },
        )
    }

    fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        let template =
            embedded::get_embedded(name).ok_or_else(|| eyre!("Prompt template not found: {}", name))?;
        debug!(template = name, "Rendering prompt template");
        self.hbs
            .render_template(template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
