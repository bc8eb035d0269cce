#![allow(clippy::unwrap_used, reason = "tests unwrap known-good construction")]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::{BuiltinCode, CustomCallbacks, ForeignDescriptor, ForeignKind, HandlerParam};

struct Plain;

impl CustomCallbacks for Plain {}

fn handler(registry: &mut TypeRegistry, mode: ParamMode, ty: TypeId) -> TypeId {
    registry
        .create_handler(&[HandlerParam::new(mode, ty)], TypeId::NULL, false)
        .unwrap()
}

#[test]
fn every_builtin_conforms_to_itself_and_any() {
    let registry = TypeRegistry::new();
    for code in BuiltinCode::ALL {
        let ty = TypeId::builtin(code);
        assert_eq!(registry.type_conforms(ty, ty), Ok(true), "{code:?}");
        assert_eq!(registry.type_conforms(ty, TypeId::ANY), Ok(true), "{code:?}");
    }
}

#[test]
fn undefined_only_fits_optional_slots() {
    let mut registry = TypeRegistry::new();
    let optional = registry.create_optional(TypeId::STRING).unwrap();
    assert_eq!(registry.type_conforms(TypeId::NULL, optional), Ok(true));
    assert_eq!(registry.type_conforms(TypeId::NULL, TypeId::STRING), Ok(false));
}

#[test]
fn distinct_builtins_do_not_conform() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.type_conforms(TypeId::NUMBER, TypeId::STRING), Ok(false));
    assert_eq!(registry.type_conforms(TypeId::ANY, TypeId::NUMBER), Ok(false));
}

#[test]
fn value_fits_its_optional() {
    let mut registry = TypeRegistry::new();
    let optional = registry.create_optional(TypeId::NUMBER).unwrap();
    assert_eq!(registry.type_conforms(TypeId::NUMBER, optional), Ok(true));
}

#[test]
fn records_have_no_structural_subtyping() {
    let mut registry = TypeRegistry::new();
    let point = registry.create_record(&[("x", TypeId::NUMBER)]).unwrap();
    let other = registry
        .create_record(&[("x", TypeId::NUMBER), ("y", TypeId::NUMBER)])
        .unwrap();
    assert_eq!(registry.type_conforms(point, point), Ok(true));
    assert_eq!(registry.type_conforms(other, point), Ok(false));
}

#[test]
fn numbers_flow_into_numeric_foreign_slots() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);
    let pointer = registry.foreign_type(ForeignKind::Pointer);
    assert_eq!(registry.type_conforms(TypeId::NUMBER, uint8), Ok(true));
    assert_eq!(registry.type_conforms(TypeId::STRING, uint8), Ok(false));
    assert_eq!(registry.type_conforms(TypeId::NUMBER, pointer), Ok(false));
}

#[test]
fn foreign_types_conform_through_their_bridge() {
    let registry = TypeRegistry::new();
    let uint8 = registry.foreign_type(ForeignKind::UInt8);
    let sint32 = registry.foreign_type(ForeignKind::SInt32);
    let boolean = registry.foreign_type(ForeignKind::Bool);
    assert_eq!(registry.type_conforms(uint8, TypeId::NUMBER), Ok(true));
    assert_eq!(registry.type_conforms(uint8, sint32), Ok(true));
    assert_eq!(registry.type_conforms(uint8, boolean), Ok(false));
    assert_eq!(registry.type_conforms(boolean, TypeId::BOOLEAN), Ok(true));
}

#[test]
fn foreign_base_chain_is_walked() {
    let mut registry = TypeRegistry::new();
    let pointer = registry.foreign_type(ForeignKind::Pointer);
    let handle = registry
        .create_foreign(
            ForeignDescriptor::primitive(
                crate::ForeignPrimitive::Pointer,
                ForeignKind::Pointer.codec(),
            )
            .with_base(pointer),
        )
        .unwrap();
    let window = registry
        .create_foreign(
            ForeignDescriptor::primitive(
                crate::ForeignPrimitive::Pointer,
                ForeignKind::Pointer.codec(),
            )
            .with_base(handle),
        )
        .unwrap();
    assert_eq!(registry.type_conforms(window, handle), Ok(true));
    assert_eq!(registry.type_conforms(window, pointer), Ok(true));
    assert_eq!(registry.type_conforms(pointer, window), Ok(false));
}

#[test]
fn custom_types_conform_to_their_ancestors() {
    let mut registry = TypeRegistry::new();
    let root = registry.create_custom(TypeId::NULL, Arc::new(Plain)).unwrap();
    let child = registry.create_custom(root, Arc::new(Plain)).unwrap();
    let unrelated = registry.create_custom(TypeId::NULL, Arc::new(Plain)).unwrap();
    assert_eq!(registry.type_conforms(child, root), Ok(true));
    assert_eq!(registry.type_conforms(root, child), Ok(false));
    assert_eq!(registry.type_conforms(child, unrelated), Ok(false));
    assert_eq!(registry.type_conforms(child, TypeId::NULL), Ok(false));
}

#[test]
fn in_parameters_are_covariant() {
    let mut registry = TypeRegistry::new();
    let narrow = handler(&mut registry, ParamMode::In, TypeId::NUMBER);
    let wide = handler(&mut registry, ParamMode::In, TypeId::ANY);
    assert_eq!(registry.type_conforms(narrow, wide), Ok(true));
    assert_eq!(registry.type_conforms(wide, narrow), Ok(false));
}

#[test]
fn out_parameters_are_contravariant() {
    let mut registry = TypeRegistry::new();
    let narrow = handler(&mut registry, ParamMode::Out, TypeId::NUMBER);
    let wide = handler(&mut registry, ParamMode::Out, TypeId::ANY);
    assert_eq!(registry.type_conforms(narrow, wide), Ok(false));
    assert_eq!(registry.type_conforms(wide, narrow), Ok(true));
}

#[test]
fn inout_parameters_are_invariant() {
    let mut registry = TypeRegistry::new();
    let narrow = handler(&mut registry, ParamMode::InOut, TypeId::NUMBER);
    let wide = handler(&mut registry, ParamMode::InOut, TypeId::ANY);
    assert_eq!(registry.type_conforms(narrow, wide), Ok(false));
    assert_eq!(registry.type_conforms(wide, narrow), Ok(false));
}

#[test]
fn modes_must_match() {
    let mut registry = TypeRegistry::new();
    let input = handler(&mut registry, ParamMode::In, TypeId::NUMBER);
    let output = handler(&mut registry, ParamMode::Out, TypeId::NUMBER);
    assert_eq!(registry.type_conforms(input, output), Ok(false));
}

#[test]
fn return_types_are_covariant() {
    let mut registry = TypeRegistry::new();
    let number = registry.create_handler(&[], TypeId::NUMBER, false).unwrap();
    let any = registry.create_handler(&[], TypeId::ANY, false).unwrap();
    assert_eq!(registry.type_conforms(number, any), Ok(true));
    assert_eq!(registry.type_conforms(any, number), Ok(false));
}

#[test]
fn arity_must_match() {
    let mut registry = TypeRegistry::new();
    let one = handler(&mut registry, ParamMode::In, TypeId::NUMBER);
    let two = registry
        .create_handler(
            &[
                HandlerParam::input(TypeId::NUMBER),
                HandlerParam::input(TypeId::NUMBER),
            ],
            TypeId::NULL,
            false,
        )
        .unwrap();
    assert_eq!(registry.type_conforms(one, two), Ok(false));
}

#[test]
fn recursive_handler_types_conform() {
    let mut registry = TypeRegistry::new();
    let a = registry.create_named("A").unwrap();
    let takes_a = registry
        .create_handler(&[HandlerParam::input(a)], TypeId::NULL, false)
        .unwrap();
    registry.bind_named(a, takes_a).unwrap();
    let b = registry.create_named("B").unwrap();
    let takes_b = registry
        .create_handler(&[HandlerParam::input(b)], TypeId::NULL, false)
        .unwrap();
    registry.bind_named(b, takes_b).unwrap();

    assert_eq!(registry.type_conforms(a, b), Ok(true));
    assert_eq!(registry.type_conforms(b, a), Ok(true));
    assert_eq!(registry.type_conforms(a, takes_b), Ok(true));
}

#[test]
fn recursive_handlers_still_check_the_rest_of_the_signature() {
    let mut registry = TypeRegistry::new();
    let a = registry.create_named("A").unwrap();
    let returns_number = registry
        .create_handler(&[HandlerParam::input(a)], TypeId::NUMBER, false)
        .unwrap();
    registry.bind_named(a, returns_number).unwrap();
    let b = registry.create_named("B").unwrap();
    let returns_string = registry
        .create_handler(&[HandlerParam::input(b)], TypeId::STRING, false)
        .unwrap();
    registry.bind_named(b, returns_string).unwrap();

    assert_eq!(registry.type_conforms(a, b), Ok(false));
}

#[test]
fn named_custom_is_its_bound_node() {
    let mut registry = TypeRegistry::new();
    let node = registry.create_custom(TypeId::NULL, Arc::new(Plain)).unwrap();
    let celsius = registry.create_named("Celsius").unwrap();
    registry.bind_named(celsius, node).unwrap();

    assert_eq!(registry.type_conforms(celsius, node), Ok(true));
    assert_eq!(registry.type_conforms(node, celsius), Ok(true));
    let optional = registry.create_optional(node).unwrap();
    assert_eq!(registry.type_conforms(celsius, optional), Ok(true));
}

#[test]
fn named_custom_child_conforms_to_bare_parent() {
    let mut registry = TypeRegistry::new();
    let parent = registry.create_custom(TypeId::NULL, Arc::new(Plain)).unwrap();
    let named_parent = registry.create_named("Temperature").unwrap();
    registry.bind_named(named_parent, parent).unwrap();
    let child = registry
        .create_custom(named_parent, Arc::new(Plain))
        .unwrap();
    let named_child = registry.create_named("Celsius").unwrap();
    registry.bind_named(named_child, child).unwrap();

    assert_eq!(registry.type_conforms(named_child, parent), Ok(true));
    assert_eq!(registry.type_conforms(child, named_parent), Ok(true));
    assert_eq!(registry.type_conforms(parent, named_child), Ok(false));
}

#[test]
fn named_record_is_its_bound_node() {
    let mut registry = TypeRegistry::new();
    let node = registry.create_record(&[("x", TypeId::NUMBER)]).unwrap();
    let point = registry.create_named("Point").unwrap();
    registry.bind_named(point, node).unwrap();

    assert_eq!(registry.type_conforms(point, node), Ok(true));
    assert_eq!(registry.type_conforms(node, point), Ok(true));
}

#[test]
fn distinct_names_over_one_record_stay_distinct() {
    let mut registry = TypeRegistry::new();
    let node = registry.create_record(&[("x", TypeId::NUMBER)]).unwrap();
    let point = registry.create_named("Point").unwrap();
    registry.bind_named(point, node).unwrap();
    let vector = registry.create_named("Vector").unwrap();
    registry.bind_named(vector, node).unwrap();

    assert_eq!(registry.type_conforms(point, vector), Ok(false));
    assert_eq!(registry.type_conforms(vector, point), Ok(false));
}

#[test]
fn named_handler_is_its_bound_node() {
    let mut registry = TypeRegistry::new();
    let node = handler(&mut registry, ParamMode::In, TypeId::NUMBER);
    let callback = registry.create_named("Callback").unwrap();
    registry.bind_named(callback, node).unwrap();

    assert_eq!(registry.type_conforms(callback, node), Ok(true));
    assert_eq!(registry.type_conforms(node, callback), Ok(true));
}

#[test]
fn unbound_types_fail_conformance() {
    let mut registry = TypeRegistry::new();
    let pending = registry.create_named("Pending").unwrap();
    assert_eq!(registry.type_conforms(pending, pending), Ok(true));
    assert_eq!(
        registry.type_conforms(pending, TypeId::NUMBER),
        Err(RuntimeError::UnboundType { name: "Pending" })
    );
}

#[test]
fn values_conform_by_dynamic_type() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.value_conforms(&Value::integer(3), TypeId::NUMBER), Ok(true));
    assert_eq!(registry.value_conforms(&Value::string("3"), TypeId::NUMBER), Ok(false));
    assert_eq!(registry.value_conforms(&Value::Null, TypeId::ANY), Ok(true));
}
