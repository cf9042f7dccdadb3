use proptest::prelude::*;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;
use zitems_definitions::{DefinitionError, DefinitionStore, DirectorySource, InMemorySource, IssueKind};
use zitems_domain::config::AttributeSchema;

fn item(key: &str, material: &str) -> String {
    format!("key = \"{key}\"\nmaterial = \"{material}\"\n")
}

fn source_with(count: usize) -> InMemorySource {
    (0..count).fold(InMemorySource::new(), |source, i| {
        source.with_toml(&format!("item_{i}.toml"), &item(&format!("item_{i}"), "STONE"))
    })
}

#[test]
fn reload_with_same_input_is_idempotent() {
    let store = DefinitionStore::open(source_with(5), AttributeSchema::default()).unwrap();
    let first = store.snapshot();
    assert_eq!(first.generation(), 1);

    let report = store.reload().unwrap();
    let second = store.snapshot();

    assert_eq!(report.generation, 2);
    assert!(report.diff.is_empty());
    assert!(first.same_templates(&second));
}

#[test]
fn one_invalid_entry_keeps_the_previous_catalog() {
    let source = source_with(4);
    let store = DefinitionStore::open(source.clone(), AttributeSchema::default()).unwrap();
    let before = store.snapshot();

    source.upsert(zitems_definitions::RawEntry::new(
        "broken.toml",
        zitems_definitions::Format::Toml,
        "key = \"broken\"\nmax_stack_size = 500\n",
    ));
    source.upsert(zitems_definitions::RawEntry::new(
        "item_0.toml",
        zitems_definitions::Format::Toml,
        item("item_0", "DIAMOND"),
    ));

    let err = store.reload().unwrap_err();
    let issues = err.issues();
    assert!(matches!(err, DefinitionError::Validation { .. }));
    assert!(issues.iter().all(|issue| issue.origin == "broken.toml"), "{issues:?}");
    assert!(issues.iter().any(|issue| issue.kind == IssueKind::MissingField));

    let after = store.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(store.get("item_0").unwrap().display.material, "STONE");
    assert!(store.get("broken").is_none());
}

#[test]
fn successful_reload_reports_the_diff() {
    let source = source_with(3);
    let store = DefinitionStore::open(source.clone(), AttributeSchema::default()).unwrap();

    source.remove("item_2.toml");
    source.upsert(zitems_definitions::RawEntry::new(
        "item_1.toml",
        zitems_definitions::Format::Toml,
        item("item_1", "EMERALD"),
    ));
    source.upsert(zitems_definitions::RawEntry::new(
        "fresh.yml",
        zitems_definitions::Format::Yaml,
        "key: fresh\nmaterial: apple\n",
    ));

    let report = store.reload().unwrap();
    assert_eq!(report.templates, 3);
    assert_eq!(report.diff.added.iter().map(|k| k.as_str()).collect::<Vec<_>>(), ["fresh"]);
    assert_eq!(report.diff.removed.iter().map(|k| k.as_str()).collect::<Vec<_>>(), ["item_2"]);
    assert_eq!(report.diff.changed.iter().map(|k| k.as_str()).collect::<Vec<_>>(), ["item_1"]);
    assert_eq!(store.get("fresh").unwrap().display.material, "APPLE");
}

#[test]
fn readers_see_whole_generations_during_reloads() {
    let source = source_with(20);
    let store = DefinitionStore::open(source.clone(), AttributeSchema::default()).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let catalog = store.snapshot();
                    let materials: Vec<_> = catalog.iter().map(|t| t.display.material.clone()).collect();
                    assert_eq!(materials.len(), 20);
                    assert!(materials.iter().all(|m| m == &materials[0]), "mixed generation: {materials:?}");
                }
            })
        })
        .collect();

    for round in 0..20 {
        let material = if round % 2 == 0 { "GOLD_BLOCK" } else { "STONE" };
        for i in 0..20 {
            source.upsert(zitems_definitions::RawEntry::new(
                format!("item_{i}.toml"),
                zitems_definitions::Format::Toml,
                item(&format!("item_{i}"), material),
            ));
        }
        // Writers edit the source entry by entry, so only reloads publish changes.
        store.reload().unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.snapshot().generation(), 21);
}

#[test]
fn directory_source_reloads_from_disk() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("weapons")).unwrap();
    fs::write(dir.path().join("weapons/ruby_sword.toml"), item("ruby_sword", "DIAMOND_SWORD")).unwrap();

    let store = DefinitionStore::open(DirectorySource::new(dir.path()), AttributeSchema::default()).unwrap();
    let folder = std::path::Path::new("weapons");
    assert_eq!(store.snapshot().folder(folder).count(), 1);

    fs::write(dir.path().join("weapons/ruby_axe.json"), r#"{"key":"ruby_axe","material":"DIAMOND_AXE"}"#).unwrap();
    let report = store.reload().unwrap();
    assert_eq!(report.diff.added.len(), 1);
    assert_eq!(store.snapshot().folder(folder).count(), 2);

    fs::write(dir.path().join("broken.yml"), "key: [unclosed").unwrap();
    let err = store.reload().unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].kind, IssueKind::Syntax);
    assert_eq!(store.snapshot().len(), 2);
}

#[test]
fn empty_store_populates_on_first_reload() {
    let store = DefinitionStore::empty(source_with(2), AttributeSchema::default());
    assert!(store.snapshot().is_empty());
    assert_eq!(store.reload().unwrap().generation, 1);
    assert_eq!(store.snapshot().len(), 2);
}

proptest! {
    #[test]
    fn reload_is_idempotent_for_any_catalog(
        keys in proptest::collection::btree_set("[a-z][a-z0-9_]{0,12}", 0..16),
        stack in 1u16..=99,
    ) {
        let source = keys.iter().fold(InMemorySource::new(), |source, key| {
            source.with_toml(key, &format!("{}max_stack_size = {stack}\n", item(key, "STONE")))
        });
        let store = DefinitionStore::open(source, AttributeSchema::default()).unwrap();
        let first = store.snapshot();
        let report = store.reload().unwrap();

        prop_assert!(report.diff.is_empty());
        prop_assert!(first.same_templates(&store.snapshot()));
        prop_assert_eq!(store.snapshot().len(), keys.len());
    }
}
