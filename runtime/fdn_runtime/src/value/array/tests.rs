use pretty_assertions::assert_eq;

use super::*;

#[test]
fn keys_are_caseless_and_keep_first_spelling() {
    let mut array = ArrayValue::new();
    assert!(array.insert("Name", Value::string("a")).is_none());
    assert!(array.insert("NAME", Value::string("b")).is_some());
    assert_eq!(array.len(), 1);
    assert_eq!(array.keys().collect::<Vec<_>>(), vec!["Name"]);
    assert_eq!(array.get("name"), Some(&Value::string("b")));
}

#[test]
fn iteration_follows_insertion_order() {
    let array: ArrayValue = [
        ("zeta", Value::integer(1)),
        ("alpha", Value::integer(2)),
        ("mid", Value::integer(3)),
    ]
    .into_iter()
    .collect();
    assert_eq!(array.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn remove_keeps_remaining_lookups_valid() {
    let mut array: ArrayValue = [
        ("a", Value::integer(1)),
        ("b", Value::integer(2)),
        ("c", Value::integer(3)),
    ]
    .into_iter()
    .collect();
    assert_eq!(array.remove("A"), Some(Value::integer(1)));
    assert_eq!(array.get("c"), Some(&Value::integer(3)));
    assert_eq!(array.get("b"), Some(&Value::integer(2)));
    assert!(!array.contains_key("a"));
}

#[test]
fn equality_ignores_order_and_case() {
    let left: ArrayValue = [("x", Value::integer(1)), ("y", Value::boolean(true))]
        .into_iter()
        .collect();
    let right: ArrayValue = [("Y", Value::boolean(true)), ("X", Value::real(1.0))]
        .into_iter()
        .collect();
    assert!(left.equals(&right));
    assert_eq!(left.hash_code(), right.hash_code());
}
