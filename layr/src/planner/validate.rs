//! Validation and normalization of loosely-shaped plan data
//!
//! Upstream payloads are parsed into a permissive `serde_json::Value`
//! first; this module turns that into the canonical [`ProjectPlan`].
//! Normalization never fails: missing or invalid fields coerce to
//! defaults, and nested structures validate recursively.

use chrono::Utc;
use serde_json::Value;

use crate::domain::{EntryKind, FileStructureItem, GeneratedBy, PlanStep, ProjectPlan, StepPriority};

/// Title used when the payload has none
pub const DEFAULT_TITLE: &str = "Generated Project Plan";

/// Overview used when the payload has none
pub const DEFAULT_OVERVIEW: &str = "No overview provided";

/// Normalize a parsed payload into the canonical plan shape
pub fn plan_from_value(data: &Value, generated_by: GeneratedBy) -> ProjectPlan {
    ProjectPlan {
        title: string_or(data.get("title"), DEFAULT_TITLE),
        overview: string_or(data.get("overview"), DEFAULT_OVERVIEW),
        requirements: validate_requirements(data.get("requirements")),
        file_structure: validate_file_structure(data.get("fileStructure")),
        next_steps: validate_next_steps(data.get("nextSteps")),
        generated_at: Utc::now(),
        generated_by,
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Requirements must come out as a sequence of strings; scalars are
/// stringified, composite values are dropped
fn validate_requirements(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

/// Normalize file-structure entries, recursing into children
pub fn validate_file_structure(value: Option<&Value>) -> Vec<FileStructureItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = opt_string(item.get("name")).unwrap_or_else(|| format!("item-{}", index));
            let kind = match item.get("type").and_then(Value::as_str) {
                Some("directory") => EntryKind::Directory,
                _ => EntryKind::File,
            };
            let path = opt_string(item.get("path"))
                .or_else(|| opt_string(item.get("name")))
                .unwrap_or_else(|| format!("item-{}", index));
            let children = match item.get("children") {
                None | Some(Value::Null) => None,
                Some(children) => Some(validate_file_structure(Some(children))),
            };

            FileStructureItem {
                name,
                kind,
                path,
                description: opt_string(item.get("description")),
                children,
            }
        })
        .collect()
}

/// Normalize next-step entries
pub fn validate_next_steps(value: Option<&Value>) -> Vec<PlanStep> {
    let Some(Value::Array(steps)) = value else {
        return Vec::new();
    };

    steps
        .iter()
        .enumerate()
        .map(|(index, step)| PlanStep {
            id: opt_string(step.get("id")).unwrap_or_else(|| format!("step-{}", index + 1)),
            description: opt_string(step.get("description")).unwrap_or_else(|| format!("Step {}", index + 1)),
            completed: step.get("completed").and_then(Value::as_bool).unwrap_or(false),
            priority: step
                .get("priority")
                .and_then(Value::as_str)
                .map(StepPriority::from_loose)
                .unwrap_or_default(),
            estimated_time: opt_string(step.get("estimatedTime")),
            dependencies: step
                .get("dependencies")
                .and_then(Value::as_array)
                .map(|deps| deps.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_empty_payload() {
        let plan = plan_from_value(&json!({}), GeneratedBy::Ai);
        assert_eq!(plan.title, DEFAULT_TITLE);
        assert_eq!(plan.overview, DEFAULT_OVERVIEW);
        assert!(plan.requirements.is_empty());
        assert!(plan.file_structure.is_empty());
        assert!(plan.next_steps.is_empty());
        assert_eq!(plan.generated_by, GeneratedBy::Ai);
    }

    #[test]
    fn test_requirements_coerce_scalars_drop_composites() {
        let plan = plan_from_value(
            &json!({"title": "X", "requirements": ["real", 1, 2, true, {"nested": 1}, [1]]}),
            GeneratedBy::Ai,
        );
        assert_eq!(plan.requirements, vec!["real", "1", "2", "true"]);
    }

    #[test]
    fn test_requirements_non_array_becomes_empty() {
        let plan = plan_from_value(&json!({"requirements": "just a string"}), GeneratedBy::Ai);
        assert!(plan.requirements.is_empty());
    }

    #[test]
    fn test_file_item_missing_type_defaults_to_file() {
        let items = validate_file_structure(Some(&json!([{"name": "README.md", "path": "README.md"}])));
        assert_eq!(items[0].kind, EntryKind::File);
    }

    #[test]
    fn test_file_item_missing_path_falls_back_to_name() {
        let items = validate_file_structure(Some(&json!([{"name": "src", "type": "directory"}])));
        assert_eq!(items[0].path, "src");
    }

    #[test]
    fn test_file_item_missing_everything_gets_placeholders() {
        let items = validate_file_structure(Some(&json!(["not an object", {}])));
        assert_eq!(items[0].name, "item-0");
        assert_eq!(items[0].path, "item-0");
        assert_eq!(items[0].kind, EntryKind::File);
        assert_eq!(items[1].name, "item-1");
    }

    #[test]
    fn test_file_item_unknown_type_defaults_to_file() {
        let items = validate_file_structure(Some(&json!([{"name": "x", "type": "symlink"}])));
        assert_eq!(items[0].kind, EntryKind::File);
    }

    #[test]
    fn test_children_validate_recursively() {
        let items = validate_file_structure(Some(&json!([{
            "name": "src",
            "type": "directory",
            "path": "src/",
            "children": [
                {"name": "lib.rs"},
                {"type": "directory", "children": []}
            ]
        }])));

        let children = items[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "lib.rs");
        assert_eq!(children[0].path, "lib.rs");
        assert_eq!(children[1].name, "item-1");
        assert_eq!(children[1].kind, EntryKind::Directory);
        assert!(children[1].children.as_ref().is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn test_null_children_stay_absent() {
        let items = validate_file_structure(Some(&json!([{"name": "a", "children": null}])));
        assert!(items[0].children.is_none());
    }

    #[test]
    fn test_step_unrecognized_priority_coerces_to_medium() {
        let steps = validate_next_steps(Some(&json!([{"id": "s", "description": "d", "priority": "urgent"}])));
        assert_eq!(steps[0].priority, StepPriority::Medium);
    }

    #[test]
    fn test_step_missing_id_synthesized_from_index() {
        let steps = validate_next_steps(Some(&json!([
            {"description": "first"},
            {"description": "second"}
        ])));
        assert_eq!(steps[0].id, "step-1");
        assert_eq!(steps[1].id, "step-2");
    }

    #[test]
    fn test_step_missing_description_synthesized() {
        let steps = validate_next_steps(Some(&json!([{}])));
        assert_eq!(steps[0].description, "Step 1");
        assert!(!steps[0].completed);
        assert_eq!(steps[0].priority, StepPriority::Medium);
    }

    #[test]
    fn test_step_dependencies_non_list_coerces_to_empty() {
        let steps = validate_next_steps(Some(&json!([{"id": "s", "dependencies": "step1"}])));
        assert!(steps[0].dependencies.is_empty());

        let steps = validate_next_steps(Some(&json!([{"id": "s", "dependencies": ["a", 1, "b"]}])));
        assert_eq!(steps[0].dependencies, vec!["a", "b"]);
    }

    #[test]
    fn test_repaired_payload_normalizes_without_error() {
        // Trailing comma plus non-string requirements, end to end
        let value = crate::planner::parse_json("{\"title\": \"X\", \"requirements\": [1,2],}").unwrap();
        let plan = plan_from_value(&value, GeneratedBy::Ai);
        assert_eq!(plan.title, "X");
        assert_eq!(plan.requirements, vec!["1", "2"]);
        assert!(plan.file_structure.is_empty());
        assert!(plan.next_steps.is_empty());
    }
}
