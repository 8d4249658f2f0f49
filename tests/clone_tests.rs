mod common;

use common::keyed_builder;
use objectfold::{CloneFilter, FilterSpec, FoldError, ObjectBuilder};
use serde_json::json;

#[test]
fn test_clone_whole_builder() {
    let builder = keyed_builder(1);
    let cloned = builder.clone();
    assert_eq!(builder.value().unwrap(), cloned.value().unwrap());
}

#[test]
fn test_clone_is_independent() {
    let mut builder = ObjectBuilder::new();
    builder.set("x", 1);
    let cloned = builder.clone_filtered(CloneFilter::All).unwrap();
    builder.delete("x");

    assert_eq!(builder.value().unwrap(), json!({}));
    assert_eq!(cloned.value().unwrap(), json!({"x": 1}));
}

#[test]
fn test_clone_does_not_see_later_appends() {
    let mut builder = keyed_builder(1);
    let cloned = builder.clone();
    builder.set("late", true);
    assert_eq!(cloned.len(), 1);
    assert_eq!(builder.len(), 2);
}

#[test]
fn test_mutating_clone_leaves_original() {
    let builder = keyed_builder(2);
    let mut cloned = builder.clone();
    cloned.clear();
    assert!(cloned.value().unwrap().as_object().unwrap().is_empty());
    assert_eq!(builder.len(), 2);
}

#[test]
fn test_clone_include_string() {
    let cloned = keyed_builder(3).clone_filtered("key2").unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_include_list() {
    let cloned = keyed_builder(3).clone_filtered(["key2"]).unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_include_is_anchored() {
    let mut builder = keyed_builder(2);
    builder.set("key", "bare");
    let cloned = builder.clone_filtered("key").unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key": "bare"}));
}

#[test]
fn test_clone_spec_include() {
    let cloned = keyed_builder(3)
        .clone_filtered(FilterSpec::new().include("key2"))
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_spec_exclude() {
    let cloned = keyed_builder(3)
        .clone_filtered(FilterSpec::new().exclude("key1"))
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"key2": "value2", "key3": "value3"})
    );
}

#[test]
fn test_clone_include_then_exclude() {
    let cloned = keyed_builder(3)
        .clone_filtered(FilterSpec::new().include("key[12]").exclude("key1"))
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_fuzzy_include() {
    let cloned = keyed_builder(2)
        .clone_filtered(FilterSpec::new().include("key").fuzzy(true))
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"key1": "value1", "key2": "value2"})
    );
}

#[test]
fn test_clone_fuzzy_exclude_everything() {
    let cloned = keyed_builder(2)
        .clone_filtered(FilterSpec::new().exclude("key").fuzzy(true))
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({}));
    assert!(cloned.is_empty());
}

#[test]
fn test_clone_fuzzy_nested_keys() {
    let mut builder = ObjectBuilder::new();
    builder.set("test.key1", "value1").set("test.key2", "value2");
    let cloned = builder
        .clone_filtered(FilterSpec::new().include("test").fuzzy(true))
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"test": {"key1": "value1", "key2": "value2"}})
    );
}

#[test]
fn test_clone_fuzzy_from_the_middle() {
    let mut builder = ObjectBuilder::new();
    builder
        .set("test.key1.subkey", "value")
        .set("test.key2.subkey", "value")
        .set("other", 1);
    let cloned = builder
        .clone_filtered(FilterSpec::new().include(r"\.key").fuzzy(true))
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"test": {"key1": {"subkey": "value"}, "key2": {"subkey": "value"}}})
    );
}

#[test]
fn test_clone_regex_pattern() {
    let mut builder = ObjectBuilder::new();
    builder
        .set("test.key1.subkey", "value")
        .set("test.key2.subkey", "value")
        .set("test.keyX.subkey", "value");
    let cloned = builder
        .clone_filtered(r"test\.key\d\.subkey")
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"test": {"key1": {"subkey": "value"}, "key2": {"subkey": "value"}}})
    );
}

#[test]
fn test_clone_keeps_every_action_for_a_key() {
    let mut builder = ObjectBuilder::new();
    builder.append("list", 1).set("other", 0).append("list", 2);
    let cloned = builder.clone_filtered("list").unwrap();
    assert_eq!(cloned.len(), 2);
    assert_eq!(cloned.value().unwrap(), json!({"list": [1, 2]}));
}

#[test]
fn test_clone_invalid_pattern() {
    let err = keyed_builder(1).clone_filtered("(").unwrap_err();
    assert!(matches!(err, FoldError::InvalidPattern { .. }));
}

#[test]
fn test_clone_with_args_no_arguments() {
    let cloned = keyed_builder(2).clone_with_args(&[]).unwrap();
    assert_eq!(cloned.len(), 2);
}

#[test]
fn test_clone_with_args_positional_strings() {
    let cloned = keyed_builder(3)
        .clone_with_args(&[json!("key1"), json!("key3")])
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"key1": "value1", "key3": "value3"})
    );
}

#[test]
fn test_clone_with_args_single_string() {
    let cloned = keyed_builder(3).clone_with_args(&[json!("key2")]).unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_with_args_array() {
    let cloned = keyed_builder(3)
        .clone_with_args(&[json!(["key2"])])
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_with_args_object_include_string() {
    let cloned = keyed_builder(3)
        .clone_with_args(&[json!({"include": "key2"})])
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_with_args_object_exclude() {
    let cloned = keyed_builder(2)
        .clone_with_args(&[json!({"exclude": ["key1"]})])
        .unwrap();
    assert_eq!(cloned.value().unwrap(), json!({"key2": "value2"}));
}

#[test]
fn test_clone_with_args_object_fuzzy() {
    let cloned = keyed_builder(2)
        .clone_with_args(&[json!({"include": ["key"], "fuzzy": true})])
        .unwrap();
    assert_eq!(
        cloned.value().unwrap(),
        json!({"key1": "value1", "key2": "value2"})
    );
}

#[test]
fn test_clone_with_args_unknown_shapes() {
    let builder = keyed_builder(1);
    for args in [
        vec![json!(42)],
        vec![json!(null)],
        vec![json!({"fuzzy": true})],
        vec![json!("key1"), json!(2)],
        vec![json!(["key1", 3])],
    ] {
        let err = builder.clone_with_args(&args).unwrap_err();
        assert!(
            matches!(err, FoldError::UnknownFilterCondition { .. }),
            "args {args:?} gave {err:?}"
        );
    }
}
