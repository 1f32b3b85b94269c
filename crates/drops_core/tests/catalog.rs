use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use drops_core::core_api::{Catalog, CoreErrorCode, normalize};
use drops_core::variation::Variation;
use serde_json::json;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join("tests/fixtures")
        .join(name)
}

fn temp_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos))
}

#[test]
fn catalog_keeps_document_order() {
    let catalog = Catalog::load_from_path(&fixture_path("raid_catalog.json"))
        .expect("raid catalog should load");

    let ids: Vec<&str> = catalog.activities.keys().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec![
            "260765522",
            "1387993552",
            "1733556769",
            "3534581229",
            "2693136600",
            "4000873610",
            "1836893116",
        ]
    );
    assert_eq!(catalog.drop_lists.len(), 4);
    assert_eq!(
        catalog.item(2001).and_then(|i| i.item_name.as_deref()),
        Some("Helm of Eao")
    );
    assert!(catalog.activity("1836893116").is_some_and(|a| a.drop_list_id.is_none()));
}

#[test]
fn legacy_strike_item_table_is_accepted() {
    let catalog = Catalog::load_from_path(&fixture_path("legacy_strike_catalog.json"))
        .expect("legacy catalog should load");

    assert_eq!(catalog.items.len(), 1);
    assert_eq!(
        catalog.activity("3").and_then(|a| a.drop_list_id.as_deref()),
        Some("7")
    );

    let result = normalize(&catalog, None).expect("legacy catalog should normalize");
    assert_eq!(result.display_list().len(), 1);
}

#[test]
fn items_field_wins_over_legacy_alias() {
    let catalog = Catalog::from_json_str(
        r#"{
            "items": { "1": { "itemHash": 1, "itemTypeDisplayName": "Titan Mark" } },
            "strikeItemHashes": { "2": { "itemHash": 2 } }
        }"#,
    )
    .expect("catalog should parse");

    assert!(catalog.item(1).is_some());
    assert!(catalog.item(2).is_none());
}

#[test]
fn missing_sections_are_empty_and_non_map_items_are_ignored() {
    let catalog = Catalog::from_json_str(
        r#"{ "activities": {}, "dropLists": { "a": {} }, "items": [1, 2, 3] }"#,
    )
    .expect("catalog should parse");

    assert!(catalog.items.is_empty());
    let list = catalog.drop_list("a").expect("drop list should exist");
    assert!(list.items.is_none());
    assert!(list.sections.is_none());
}

#[test]
fn load_reports_io_and_parse_errors() {
    let root = temp_test_dir("drops_catalog_load");
    fs::create_dir_all(&root).expect("failed to create temp root");

    let missing = Catalog::load_from_path(&root.join("nope.json")).expect_err("missing file");
    assert_eq!(missing.code(), CoreErrorCode::Io);

    let broken = root.join("broken.json");
    fs::write(&broken, b"{ \"activities\": [").expect("failed to write broken catalog");
    let err = Catalog::load_from_path(&broken).expect_err("broken file");
    assert_eq!(err.code(), CoreErrorCode::Parse);
    assert!(err.to_string().contains("broken.json"));

    let bad_id = root.join("bad_id.json");
    fs::write(
        &bad_id,
        br#"{ "activities": { "1": { "dropListID": [1] } } }"#,
    )
    .expect("failed to write bad catalog");
    let err = Catalog::load_from_path(&bad_id).expect_err("array drop list id");
    assert_eq!(err.code(), CoreErrorCode::Parse);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn variations_know_their_titles_and_sources() {
    assert_eq!(Variation::parse("raid"), Some(Variation::Raid));
    assert_eq!(Variation::parse("Strikes"), Some(Variation::Strike));
    assert_eq!(Variation::parse("crucible"), None);
    assert_eq!(Variation::Raid.title(), "Raids");
    assert_eq!(Variation::Strike.title(), "All Activities");
    assert!(Variation::Raid.data_url().is_some_and(|url| url.ends_with("combinedRaidDrops.json")));
    assert_eq!(Variation::Strike.data_url(), None);
}

#[test]
fn value_input_keeps_document_order() {
    let catalog = Catalog::from_json_value(json!({
        "activities": {
            "300": { "activityHash": 300, "zeta": 1, "alpha": 2 },
            "100": { "activityHash": 100 },
            "200": { "activityHash": 200 }
        },
        "items": {
            "9": { "itemHash": 9, "tierTypeName": "Exotic", "bucket": "Helmet" },
            "1": { "itemHash": 1 }
        }
    }))
    .expect("catalog should parse");

    let ids: Vec<&str> = catalog.activities.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["300", "100", "200"]);
    let items: Vec<&str> = catalog.items.keys().map(String::as_str).collect();
    assert_eq!(items, vec!["9", "1"]);

    let extra: Vec<&str> = catalog
        .activity("300")
        .expect("activity 300")
        .extra
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(extra, vec!["zeta", "alpha"]);
}

#[test]
fn repeated_key_keeps_first_position_and_last_value() {
    let catalog = Catalog::from_json_str(
        r#"{ "activities": {
            "5": { "activityName": "First" },
            "6": { "activityName": "Other" },
            "5": { "activityName": "Second" }
        } }"#,
    )
    .expect("catalog should parse");

    let names: Vec<&str> = catalog
        .activities
        .values()
        .map(|a| a.activity_name.as_str())
        .collect();
    assert_eq!(names, vec!["Second", "Other"]);
}
