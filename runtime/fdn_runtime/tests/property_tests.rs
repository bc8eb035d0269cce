//! Property-based tests over randomly built type graphs.
//!
//! A graph is grown from the builtins by a random sequence of alias,
//! optional, record, handler and named-type constructions. Named types are
//! bound as soon as they are created, so every type in a graph resolves.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::cast_possible_truncation,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use fdn_runtime::{
    BuiltinCode, ForeignKind, ForeignValue, HandlerParam, ParamMode, RuntimeError, TypeId,
    TypeRegistry, Value,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Step {
    Alias(u8, usize),
    Optional(usize),
    Record(Vec<usize>),
    Handler(Vec<(u8, usize)>, usize),
    Named(u8, usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..4, any::<usize>()).prop_map(|(name, target)| Step::Alias(name, target)),
        any::<usize>().prop_map(Step::Optional),
        prop::collection::vec(any::<usize>(), 0..4).prop_map(Step::Record),
        (
            prop::collection::vec((0u8..3, any::<usize>()), 0..3),
            any::<usize>()
        )
            .prop_map(|(params, ret)| Step::Handler(params, ret)),
        (0u8..4, any::<usize>()).prop_map(|(name, target)| Step::Named(name, target)),
    ]
}

fn pick(types: &[TypeId], choice: usize) -> TypeId {
    types[choice % types.len()]
}

fn mode(code: u8) -> ParamMode {
    match code {
        0 => ParamMode::In,
        1 => ParamMode::Out,
        _ => ParamMode::InOut,
    }
}

fn build(steps: &[Step]) -> (TypeRegistry, Vec<TypeId>) {
    let mut registry = TypeRegistry::new();
    let mut types: Vec<TypeId> = BuiltinCode::ALL
        .iter()
        .flat_map(|&code| [TypeId::builtin(code), registry.create_builtin(code)])
        .collect();
    types.push(registry.foreign_type(ForeignKind::UInt8));
    types.push(registry.foreign_type(ForeignKind::Float64));

    for step in steps {
        let id = match step {
            Step::Alias(name, target) => registry
                .create_alias(&format!("A{name}"), pick(&types, *target))
                .unwrap(),
            Step::Optional(base) => registry.create_optional(pick(&types, *base)).unwrap(),
            Step::Record(fields) => {
                let names: Vec<String> = (0..fields.len()).map(|i| format!("f{i}")).collect();
                let fields: Vec<(&str, TypeId)> = names
                    .iter()
                    .zip(fields)
                    .map(|(name, &ty)| (name.as_str(), pick(&types, ty)))
                    .collect();
                registry.create_record(&fields).unwrap()
            }
            Step::Handler(params, ret) => {
                let params: Vec<HandlerParam> = params
                    .iter()
                    .map(|&(code, ty)| HandlerParam::new(mode(code), pick(&types, ty)))
                    .collect();
                registry
                    .create_handler(&params, pick(&types, *ret), false)
                    .unwrap()
            }
            Step::Named(name, target) => {
                let target = pick(&types, *target);
                let named = registry.create_named(&format!("N{name}")).unwrap();
                if !registry.is_bound(named) {
                    registry.bind_named(named, target).unwrap();
                }
                named
            }
        };
        types.push(id);
    }
    (registry, types)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_type_conforms_to_itself_and_any(steps in prop::collection::vec(step_strategy(), 0..24)) {
        let (registry, types) = build(&steps);
        for &ty in &types {
            prop_assert!(registry.type_conforms(ty, ty).unwrap(), "{}", registry.describe(ty));
            let resolved = registry.resolve(ty).unwrap();
            prop_assert!(registry.conforms(&resolved, &resolved).unwrap());
            prop_assert!(registry.type_conforms(ty, TypeId::ANY).unwrap(), "{}", registry.describe(ty));
        }
    }

    #[test]
    fn undefined_goes_only_where_optional(steps in prop::collection::vec(step_strategy(), 0..24)) {
        let (mut registry, types) = build(&steps);
        for &ty in &types {
            let resolved = registry.resolve(ty).unwrap();
            let conforms = registry.type_conforms(TypeId::NULL, ty).unwrap();
            if resolved.is_optional {
                prop_assert!(conforms, "{}", registry.describe(ty));
            } else if resolved.named != Some(TypeId::NULL) {
                prop_assert!(!conforms, "{}", registry.describe(ty));
            }

            let optional = registry.create_optional(ty).unwrap();
            prop_assert!(registry.type_conforms(TypeId::NULL, optional).unwrap());
        }
    }

    #[test]
    fn construction_is_interned(steps in prop::collection::vec(step_strategy(), 0..24)) {
        let (mut registry, types) = build(&steps);
        for &ty in &types {
            let optional = registry.create_optional(ty).unwrap();
            prop_assert_eq!(registry.create_optional(optional).unwrap(), optional);
            prop_assert_eq!(registry.create_optional(ty).unwrap(), optional);
            prop_assert_eq!(
                registry.create_alias("Again", ty).unwrap(),
                registry.create_alias("AGAIN", ty).unwrap()
            );

            if let Some(record) = registry.as_record(ty) {
                let fields: Vec<(&str, TypeId)> = record
                    .fields
                    .iter()
                    .map(|field| (registry.name_str(field.name), field.ty))
                    .collect();
                prop_assert_eq!(registry.create_record(&fields).unwrap(), ty);
            }
            if let Some(handler) = registry.as_handler(ty) {
                let params = handler.params.clone();
                let (ret, is_foreign) = (handler.ret, handler.is_foreign());
                prop_assert_eq!(registry.create_handler(&params, ret, is_foreign).unwrap(), ty);
            }
        }
    }

    #[test]
    fn sint32_round_trips_every_integer(i in any::<i32>()) {
        let registry = TypeRegistry::new();
        let sint32 = registry.foreign_type(ForeignKind::SInt32);
        let value = ForeignValue::export(&registry, sint32, &Value::integer(i)).unwrap();
        prop_assert_eq!(value.as_foreign().unwrap().import().unwrap(), Value::integer(i));
    }

    #[test]
    fn uint8_export_checks_range(i in -1000i32..1000) {
        let registry = TypeRegistry::new();
        let uint8 = registry.foreign_type(ForeignKind::UInt8);
        let result = ForeignValue::export(&registry, uint8, &Value::integer(i));
        if (0..=255).contains(&i) {
            let value = result.unwrap();
            prop_assert_eq!(value.as_foreign().unwrap().contents().to_vec(), vec![i as u8]);
        } else {
            prop_assert_eq!(result.unwrap_err(), RuntimeError::NumericOverflow { target: "UInt8" });
        }
    }

    #[test]
    fn sint64_export_needs_an_exact_double(r in -1e17f64..1e17) {
        let registry = TypeRegistry::new();
        let sint64 = registry.foreign_type(ForeignKind::SInt64);
        let exact = r.fract() == 0.0 && r.abs() <= 9_007_199_254_740_992.0;
        let result = ForeignValue::export(&registry, sint64, &Value::real(r));
        prop_assert_eq!(result.is_ok(), exact, "{}", r);
        if let Ok(value) = result {
            prop_assert_eq!(value.as_foreign().unwrap().import().unwrap(), Value::real(r));
        }
    }
}
