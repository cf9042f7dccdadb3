use parking_lot::Mutex;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use zitems_domain::prelude::*;
use zitems_recipes::{RecipeBinder, RecipeBinding, RecipeError, RecipeSink};

#[derive(Debug, Default)]
struct RecipeBook {
    recipes: Mutex<BTreeSet<String>>,
    refuse: Mutex<BTreeSet<String>>,
}

impl RecipeBook {
    fn keys(&self) -> Vec<String> {
        self.recipes.lock().iter().cloned().collect()
    }
}

impl RecipeSink for RecipeBook {
    fn install(&self, binding: &RecipeBinding) -> Result<(), Cow<'static, str>> {
        if self.refuse.lock().contains(&binding.key) {
            return Err("recipe book is full".into());
        }
        self.recipes.lock().insert(binding.key.clone());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.recipes.lock().remove(key);
    }
}

fn shaped(key: &str, pattern: &[&str], legend: &[(char, &str)], amount: u16) -> ItemTemplate {
    let mut template = ItemTemplate::new(TemplateKey::parse(key).unwrap(), "DIAMOND_SWORD");
    template.recipe = Some(RecipeDefinition {
        kind: RecipeKind::Shaped,
        pattern: pattern.iter().map(|row| (*row).to_owned()).collect(),
        legend: legend.iter().map(|(c, i)| (*c, Ingredient::parse(i).unwrap())).collect::<BTreeMap<_, _>>(),
        ingredients: Vec::new(),
        amount,
        group: None,
        category: None,
        cooking_time: None,
        experience: None,
        priority: 0,
    });
    template
}

fn setup() -> (Arc<RecipeBook>, RecipeBinder) {
    let book = Arc::new(RecipeBook::default());
    let binder = RecipeBinder::new(Arc::clone(&book) as Arc<dyn RecipeSink>);
    (book, binder)
}

#[test]
fn same_shape_different_outputs_conflict_and_neither_is_installed() {
    let (book, binder) = setup();
    let templates = [
        shaped("ruby_sword", &[" R ", " R ", " S "], &[('R', "redstone"), ('S', "stick")], 1),
        shaped("blood_blade", &["X", "X", "Y"], &[('X', "minecraft:redstone"), ('Y', "stick")], 1),
        shaped("ruby_pick", &["RRR", " S ", " S "], &[('R', "redstone"), ('S', "stick")], 1),
    ];

    let err = binder.bind(&templates).unwrap_err();
    assert!(matches!(err, RecipeError::Conflict { .. }));
    assert_eq!(err.keys(), ["blood_blade", "ruby_sword"]);
    assert_eq!(book.keys(), ["zitems:ruby_pick"]);
    assert_eq!(binder.installed(), ["zitems:ruby_pick"]);
}

#[test]
fn rebind_replaces_previous_bindings() {
    let (book, binder) = setup();
    let first = [
        shaped("a", &["X"], &[('X', "diamond")], 1),
        shaped("b", &["XX"], &[('X', "diamond")], 1),
    ];
    let bound = binder.bind(&first).unwrap();
    assert_eq!(bound.keys().collect::<Vec<_>>(), ["zitems:a", "zitems:b"]);

    let second = [shaped("c", &["X", "X"], &[('X', "emerald")], 2)];
    let bound = binder.rebind(&second).unwrap();
    assert_eq!(bound.len(), 1);
    assert_eq!(book.keys(), ["zitems:c"]);
    assert_eq!(binder.unbind_all(), 1);
    assert!(book.keys().is_empty());
}

#[test]
fn bind_twice_does_not_duplicate() {
    let (book, binder) = setup();
    let templates = [shaped("a", &["X"], &[('X', "diamond")], 1)];
    binder.bind(&templates).unwrap();
    binder.bind(&templates).unwrap();
    assert_eq!(binder.installed(), ["zitems:a"]);
    assert_eq!(book.keys(), ["zitems:a"]);
}

#[test]
fn refused_bindings_are_reported_and_others_kept() {
    let (book, binder) = setup();
    book.refuse.lock().insert("zitems:b".to_owned());
    let templates = [
        shaped("a", &["X"], &[('X', "diamond")], 1),
        shaped("b", &["XX"], &[('X', "diamond")], 1),
    ];

    let err = binder.bind(&templates).unwrap_err();
    assert!(matches!(err, RecipeError::Sink { .. }));
    assert_eq!(err.keys(), ["zitems:b"]);
    assert!(err.to_string().contains("recipe book is full"));
    assert_eq!(book.keys(), ["zitems:a"]);
}

#[test]
fn custom_namespace_prefixes_keys() {
    let book = Arc::new(RecipeBook::default());
    let binder = RecipeBinder::with_namespace("myserver", Arc::clone(&book) as Arc<dyn RecipeSink>);
    binder.bind(&[shaped("a", &["X"], &[('X', "diamond")], 1)]).unwrap();
    assert_eq!(book.keys(), ["myserver:a"]);
    assert_eq!(binder.namespace(), "myserver");
}

#[test]
fn concurrent_rebinds_leave_one_complete_set() {
    let (book, binder) = setup();
    let old = [
        shaped("old_a", &["X"], &[('X', "diamond")], 1),
        shaped("old_b", &["XX"], &[('X', "diamond")], 1),
    ];
    let new = [shaped("new_c", &["X", "X"], &[('X', "emerald")], 1)];

    for _ in 0..500 {
        std::thread::scope(|scope| {
            scope.spawn(|| binder.rebind(&old).unwrap());
            scope.spawn(|| binder.rebind(&new).unwrap());
        });
        let keys = book.keys();
        assert!(
            keys == ["zitems:old_a", "zitems:old_b"] || keys == ["zitems:new_c"],
            "mixed recipe set {keys:?}"
        );
        assert_eq!(binder.installed().len(), keys.len());
    }
}
