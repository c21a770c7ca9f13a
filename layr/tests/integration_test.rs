//! Integration tests for Layr
//!
//! These exercise the plan pipeline end-to-end on canned model output and
//! the round-trip through the version store, without any network access.

use layr::config::{Config, ProviderConfig};
use layr::domain::{EntryKind, GeneratedBy, StepPriority};
use layr::planner::{self, PlanCache, extract_json, parse_json, plan_from_value, plan_to_markdown};
use layr::provider::create_provider;
use tempfile::TempDir;
use versionstore::{VersionMetadata, VersionStore};

/// A realistic raw model response: prose around a fenced JSON plan with
/// a trailing comma defect
const RAW_MODEL_OUTPUT: &str = r#"Sure! Here is the project plan you asked for:

```json
{
  "title": "Recipe Box",
  "overview": "A small app for storing and searching personal recipes.",
  "requirements": ["Store recipes", "Full-text search", 42],
  "fileStructure": [
    {
      "name": "src",
      "type": "directory",
      "path": "src/",
      "children": [
        {"name": "app.js", "path": "src/app.js"}
      ]
    }
  ],
  "nextSteps": [
    {"description": "Scaffold the project", "priority": "urgent"},
  ]
}
```

Let me know if you want changes!"#;

#[test]
fn test_pipeline_extract_repair_validate_render() {
    let candidate = extract_json(RAW_MODEL_OUTPUT).expect("fenced JSON should be found");
    let value = parse_json(&candidate).expect("trailing comma should be repaired");
    let plan = plan_from_value(&value, GeneratedBy::Ai);

    assert_eq!(plan.title, "Recipe Box");
    // Non-string requirement coerced, not dropped
    assert_eq!(plan.requirements, vec!["Store recipes", "Full-text search", "42"]);
    // Child item defaults: missing type becomes a file
    let children = plan.file_structure[0].children.as_ref().unwrap();
    assert_eq!(children[0].kind, EntryKind::File);
    // Unrecognized priority coerced to medium, id synthesized
    assert_eq!(plan.next_steps[0].priority, StepPriority::Medium);
    assert_eq!(plan.next_steps[0].id, "step-1");

    let markdown = plan_to_markdown(&plan);
    assert!(markdown.starts_with(planner::PLAN_WATERMARK));
    assert!(planner::is_generated_plan(&markdown));
    assert!(markdown.contains("# Recipe Box"));
}

#[test]
fn test_plan_survives_version_store_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = VersionStore::open(Some(temp.path()), 50);

    let candidate = extract_json(RAW_MODEL_OUTPUT).unwrap();
    let value = parse_json(&candidate).unwrap();
    let mut plan = plan_from_value(&value, GeneratedBy::Ai);

    let metadata = VersionMetadata {
        model: Some("llama-3.3-70b-versatile".to_string()),
        prompt: Some("a recipe app".to_string()),
        description: "Initial plan".to_string(),
        version_label: Some("v1".to_string()),
    };
    let id = store.save_version(&plan, metadata).expect("save should succeed");

    // Snapshots own their data: mutating the live plan changes nothing
    plan.title = "Mutated".to_string();

    let version = store
        .get_version::<layr::ProjectPlan>(&id)
        .expect("saved version should load");
    assert_eq!(version.plan.title, "Recipe Box");
    assert_eq!(version.plan.next_steps[0].id, "step-1");
    assert_eq!(version.metadata.version_label.as_deref(), Some("v1"));
}

#[test]
fn test_version_retention_end_to_end() {
    let temp = TempDir::new().unwrap();
    let store = VersionStore::open(Some(temp.path()), 50);

    let plan = layr::ProjectPlan::new("P", "O", GeneratedBy::Ai);
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(
            store
                .save_version(&plan, VersionMetadata::new(format!("v{}", i)))
                .unwrap(),
        );
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert_eq!(store.cleanup_old_versions(2), 3);

    let versions = store.get_versions::<layr::ProjectPlan>();
    assert_eq!(versions.len(), 2);
    // Exactly the two most recent survive, and the rest resolve to absent
    assert_eq!(versions[0].id, ids[4]);
    assert_eq!(versions[1].id, ids[3]);
    for old_id in &ids[..3] {
        assert!(store.get_version::<layr::ProjectPlan>(old_id).is_none());
    }
}

#[test]
fn test_cache_ttl_and_capacity_via_public_api() {
    let mut cache = PlanCache::new(std::time::Duration::ZERO, 2);
    let plan = layr::ProjectPlan::new("T", "O", GeneratedBy::Ai);

    cache.set("expired", &plan);
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(cache.get("expired").is_none());
    assert_eq!(cache.len(), 0);

    let mut cache = PlanCache::new(std::time::Duration::from_secs(3600), 2);
    cache.set("a", &plan);
    cache.set("b", &plan);
    cache.set("c", &plan);
    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_none());
}

#[test]
fn test_factory_rejects_unknown_provider_case_preserved() {
    let err = create_provider("ChatGPT", &ProviderConfig::default())
        .err()
        .expect("unknown provider must fail");
    assert_eq!(err.to_string(), "Unsupported AI provider: \"ChatGPT\"");
}

#[test]
fn test_config_defaults_build_a_planner() {
    let config = Config::default();
    let planner = layr::Planner::from_config(&config).expect("default config should resolve");
    assert_eq!(planner.provider().name(), "Groq");
}
