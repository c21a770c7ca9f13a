//! Canonical project plan types
//!
//! A ProjectPlan is the normalized output of the plan pipeline. Adapters may
//! return partial or malformed data; after validation every plan has this
//! exact shape, with `file_structure` and `next_steps` always present as
//! (possibly empty) sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which backend family produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratedBy {
    /// Cloud-hosted AI backend
    #[default]
    Ai,
    /// Locally-hosted model server
    AiLocal,
    /// Deterministic rule-based fallback
    Rules,
}

impl std::fmt::Display for GeneratedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ai => write!(f, "ai"),
            Self::AiLocal => write!(f, "ai-local"),
            Self::Rules => write!(f, "rules"),
        }
    }
}

/// Priority of a plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl StepPriority {
    /// Parse a loosely-typed priority value, coercing anything
    /// unrecognized to `Medium`
    pub fn from_loose(value: &str) -> Self {
        match value {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for StepPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Kind of a file-structure entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Directory,
}

/// One node in the proposed file tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStructureItem {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Child entries for directories; depth is unbounded in principle,
    /// in practice models emit at most two or three levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileStructureItem>>,
}

/// One actionable step in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Unique within a plan; synthesized during validation when absent
    pub id: String,

    pub description: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub priority: StepPriority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,

    /// Ids of steps this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// The canonical structured project plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPlan {
    pub title: String,

    /// For freeform adapters this holds the entire markdown document
    pub overview: String,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[serde(default)]
    pub file_structure: Vec<FileStructureItem>,

    #[serde(default)]
    pub next_steps: Vec<PlanStep>,

    pub generated_at: DateTime<Utc>,

    #[serde(default)]
    pub generated_by: GeneratedBy,
}

impl ProjectPlan {
    /// Create an empty plan shell with the given title and overview
    pub fn new(title: impl Into<String>, overview: impl Into<String>, generated_by: GeneratedBy) -> Self {
        Self {
            title: title.into(),
            overview: overview.into(),
            requirements: Vec::new(),
            file_structure: Vec::new(),
            next_steps: Vec::new(),
            generated_at: Utc::now(),
            generated_by,
        }
    }
}
