#![allow(clippy::unwrap_used, reason = "tests unwrap known-good construction")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{ForeignKind, RuntimeError};

#[test]
fn managed_values_export_into_foreign_slots() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);

    let converted = convert(&registry, &Value::integer(200), uint8).unwrap().unwrap();
    let foreign = converted.as_foreign().unwrap();
    assert_eq!(foreign.type_id(), uint8);
    assert_eq!(foreign.contents(), &[200]);
}

#[test]
fn export_overflow_is_an_error_not_a_mismatch() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);
    assert_eq!(
        convert(&registry, &Value::real(1e300), uint8),
        Err(RuntimeError::NumericOverflow { target: "UInt8" })
    );
}

#[test]
fn foreign_values_import_into_managed_slots() {
    let registry = TypeRegistry::new();
    let sint64 = registry.foreign_type(ForeignKind::SInt64);
    let foreign = ForeignValue::create(&registry, sint64, &(1i64 << 40).to_ne_bytes()).unwrap();

    let converted = convert(&registry, &foreign, TypeId::NUMBER).unwrap().unwrap();
    assert_eq!(converted, Value::real(1_099_511_627_776.0));
    assert_eq!(bridge(&registry, &foreign).unwrap(), converted);
}

#[test]
fn foreign_to_foreign_goes_through_the_bridge() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);
    let sint32 = registry.foreign_type(ForeignKind::SInt32);
    let small = ForeignValue::export(&registry, uint8, &Value::integer(9)).unwrap();

    let widened = convert(&registry, &small, sint32).unwrap().unwrap();
    let foreign = widened.as_foreign().unwrap();
    assert_eq!(foreign.type_id(), sint32);
    assert_eq!(foreign.contents(), &9i32.to_ne_bytes());
}

#[test]
fn same_foreign_type_is_shared() {
    let registry = TypeRegistry::new();
    let float64 = registry.foreign_type(ForeignKind::Float64);
    let value = ForeignValue::export(&registry, float64, &Value::real(0.25)).unwrap();
    let converted = convert(&registry, &value, float64).unwrap().unwrap();
    assert!(converted.ptr_eq(&value));
}

#[test]
fn undefined_fills_only_optional_slots() {
    let mut registry = TypeRegistry::new();
    let uint16 = registry.foreign_type(ForeignKind::UInt16);
    let optional = registry.create_optional(uint16).unwrap();

    assert_eq!(convert(&registry, &Value::Null, optional).unwrap(), Some(Value::Null));
    assert_eq!(convert(&registry, &Value::Null, uint16).unwrap(), None);

    let exported = convert(&registry, &Value::integer(3), optional).unwrap().unwrap();
    assert_eq!(exported.type_id(), uint16);
}

#[test]
fn non_conforming_values_give_none() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);
    assert_eq!(convert(&registry, &Value::string("7"), uint8).unwrap(), None);
    assert_eq!(convert(&registry, &Value::integer(7), TypeId::STRING).unwrap(), None);
}

#[test]
fn managed_values_pass_through() {
    let registry = TypeRegistry::new();
    let text = Value::string("kept");
    let converted = convert(&registry, &text, TypeId::ANY).unwrap().unwrap();
    assert!(converted.ptr_eq(&text));
    assert!(bridge(&registry, &text).unwrap().ptr_eq(&text));
}

#[test]
fn pointers_stay_foreign() {
    let registry = TypeRegistry::new();
    let pointer = registry.foreign_type(ForeignKind::Pointer);
    let value = ForeignValue::create_initialized(&registry, pointer).unwrap();

    assert!(bridge(&registry, &value).unwrap().ptr_eq(&value));
    let converted = convert(&registry, &value, TypeId::ANY).unwrap().unwrap();
    assert!(converted.ptr_eq(&value));
}
