use std::path::PathBuf;

use drops_core::core_api::{Catalog, CoreError, CoreErrorCode, Engine, ReferencePolicy, normalize};

fn dangling_catalog() -> Catalog {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join("tests/fixtures/dangling_catalog.json");
    Catalog::load_from_path(&path).unwrap_or_else(|e| panic!("failed to load {:?}: {}", path, e))
}

#[test]
fn default_policy_fails_whole_batch() {
    let catalog = dangling_catalog();

    let err = normalize(&catalog, None).expect_err("dangling item should fail");
    assert_eq!(err.code(), CoreErrorCode::DanglingReference);
    assert_eq!(
        err,
        CoreError::DanglingItem {
            activity: "1".to_string(),
            drop_list: "v1".to_string(),
            item_hash: 99,
        }
    );
    assert!(err.to_string().contains("99"));
    assert_eq!(Engine::new().policy(), ReferencePolicy::FailBatch);
}

#[test]
fn drop_activity_policy_only_loses_the_offender() {
    let catalog = dangling_catalog();
    let engine = Engine::with_policy(ReferencePolicy::DropActivity);

    let result = engine
        .normalize(&catalog, None)
        .expect("drop-activity policy should succeed");

    let vault = result.activity("1").expect("vault should be kept");
    assert!(vault.drops.is_none());
    assert!(vault.sections.is_none());

    let names: Vec<&str> = result.display_list().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["Pit"]);
}

#[test]
fn skip_item_policy_keeps_resolvable_items() {
    let catalog = dangling_catalog();
    let engine = Engine::with_policy(ReferencePolicy::SkipItem);

    let result = engine
        .normalize(&catalog, None)
        .expect("skip-item policy should succeed");

    let vault = result.activity("1").expect("vault should be kept");
    let hashes: Vec<u32> = vault.items().map(|i| i.hash).collect();
    assert_eq!(hashes, vec![55]);
    assert_eq!(result.display_list().len(), 2);
}

#[test]
fn policy_names_parse() {
    assert_eq!(ReferencePolicy::parse("fail-batch"), Some(ReferencePolicy::FailBatch));
    assert_eq!(ReferencePolicy::parse("Drop-Activity"), Some(ReferencePolicy::DropActivity));
    assert_eq!(ReferencePolicy::parse("skip-item"), Some(ReferencePolicy::SkipItem));
    assert_eq!(ReferencePolicy::parse("ignore"), None);
    assert_eq!(ReferencePolicy::SkipItem.as_str(), "skip-item");
}
