//! Domain types for Layr
//!
//! The canonical plan representation shared by the provider layer, the
//! plan pipeline, the cache, and the version store.

mod plan;

pub use plan::{EntryKind, FileStructureItem, GeneratedBy, PlanStep, ProjectPlan, StepPriority};
