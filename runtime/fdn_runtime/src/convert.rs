//! Slot conversion: fitting a value into a typed slot.
//!
//! This is what property setters and argument binders do at a type
//! boundary: check conformance, then bridge in or out of the foreign
//! representation as the slot requires.

use crate::{ForeignValue, RuntimeResult, TypeId, TypeRegistry, Value};

/// Whether the value is foreign and its type declares a bridge.
fn has_bridge(registry: &TypeRegistry, value: &Value) -> RuntimeResult<bool> {
    let Some(foreign) = value.as_foreign() else {
        return Ok(false);
    };
    let concrete = registry.resolve_concrete(foreign.type_id())?;
    Ok(registry
        .as_foreign(concrete)
        .is_some_and(|info| info.descriptor.bridge.is_some()))
}

/// Convert `value` for a slot of type `to`.
///
/// Returns `None` when the value does not conform. Otherwise:
/// - a foreign value of the slot's own foreign type is shared as is
/// - a foreign value headed for a managed slot is imported
/// - a managed value headed for a foreign slot is exported, except that
///   undefined stays undefined in an optional foreign slot
/// - between two different foreign types the value goes through the
///   shared bridge type
pub fn convert(registry: &TypeRegistry, value: &Value, to: TypeId) -> RuntimeResult<Option<Value>> {
    if !registry.value_conforms(value, to)? {
        tracing::trace!(kind = value.kind().name(), ?to, "value does not conform");
        return Ok(None);
    }

    let target = registry.resolve(to)?;
    let target_is_foreign = registry.as_foreign(target.ty).is_some();
    // Exported values carry the slot's type without its optional layer.
    let slot = target.named.unwrap_or(target.ty);

    let converted = match (value.as_foreign(), target_is_foreign) {
        (None, false) => value.clone(),
        (None, true) => {
            if value.is_null() && target.is_optional {
                Value::Null
            } else {
                ForeignValue::export(registry, slot, value)?
            }
        }
        (Some(foreign), false) => {
            if has_bridge(registry, value)? {
                foreign.import()?
            } else {
                value.clone()
            }
        }
        (Some(foreign), true) => {
            let source = registry.resolve_concrete(foreign.type_id())?;
            if source == target.ty || !has_bridge(registry, value)? {
                value.clone()
            } else {
                let bridged = foreign.import()?;
                ForeignValue::export(registry, slot, &bridged)?
            }
        }
    };
    Ok(Some(converted))
}

/// Import a foreign value to its bridge type. Anything else, including
/// foreign values without a bridge, is returned unchanged.
pub fn bridge(registry: &TypeRegistry, value: &Value) -> RuntimeResult<Value> {
    match value.as_foreign() {
        Some(foreign) if has_bridge(registry, value)? => foreign.import(),
        _ => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests;
