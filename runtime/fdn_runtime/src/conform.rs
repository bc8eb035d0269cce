//! Conformance: may a value of one type be used where another is expected?
//!
//! Rules are applied in order to resolved types; cheap identity checks
//! come first so the structural walks only run when they must.
//!
//! Callers are expected to pass sources with stable identity (a Named,
//! Handler or Optional type). A bare record, custom or handler node is the
//! same type as a Named type bound to it; other bare nodes only match
//! themselves.

use smallvec::SmallVec;

use crate::stack::ensure_sufficient_stack;
use crate::{
    HandlerInfo, ParamMode, ResolvedType, RuntimeError, RuntimeResult, TypeId, TypeInfo,
    TypeRegistry, Value,
};

/// `(source, target)` pairs currently being compared. A pair that comes
/// back around while it is still open is taken to conform, so recursive
/// handler types terminate.
type Assumptions = SmallVec<[(TypeId, TypeId); 8]>;

/// Identity used by conformance: the Named type when there is one, the
/// concrete node otherwise.
fn same_identity(a: &ResolvedType, b: &ResolvedType) -> bool {
    match (a.named, b.named) {
        (Some(a), Some(b)) => a == b,
        (None, None) => a.ty == b.ty,
        _ => false,
    }
}

impl TypeRegistry {
    /// Check whether `source` conforms to `target`, resolving both.
    pub fn type_conforms(&self, source: TypeId, target: TypeId) -> RuntimeResult<bool> {
        self.type_conforms_at(source, target, 0, &mut Assumptions::new())
    }

    /// Check whether a value's dynamic type conforms to `target`.
    pub fn value_conforms(&self, value: &Value, target: TypeId) -> RuntimeResult<bool> {
        self.type_conforms(value.type_id(), target)
    }

    /// Check conformance between two already-resolved types.
    pub fn conforms(&self, source: &ResolvedType, target: &ResolvedType) -> RuntimeResult<bool> {
        self.conforms_at(source, target, 0, &mut Assumptions::new())
    }

    fn type_conforms_at(
        &self,
        source: TypeId,
        target: TypeId,
        depth: usize,
        assumed: &mut Assumptions,
    ) -> RuntimeResult<bool> {
        if source == target || assumed.contains(&(source, target)) {
            return Ok(true);
        }
        let resolved_source = self.resolve(source)?;
        let resolved_target = self.resolve(target)?;

        assumed.push((source, target));
        let result = self.conforms_at(&resolved_source, &resolved_target, depth, assumed);
        assumed.pop();
        result
    }

    fn conforms_at(
        &self,
        source: &ResolvedType,
        target: &ResolvedType,
        depth: usize,
        assumed: &mut Assumptions,
    ) -> RuntimeResult<bool> {
        if depth > self.config().max_resolve_depth {
            return Err(RuntimeError::RecursionLimit { depth });
        }
        let result = self.apply_rules(source, target, depth, assumed)?;
        tracing::trace!(?source, ?target, result, "conformance");
        Ok(result)
    }

    fn apply_rules(
        &self,
        source: &ResolvedType,
        target: &ResolvedType,
        depth: usize,
        assumed: &mut Assumptions,
    ) -> RuntimeResult<bool> {
        if same_identity(source, target) {
            return Ok(true);
        }

        // Undefined goes only where undefined is allowed.
        if source.named == Some(TypeId::NULL) {
            return Ok(target.is_optional);
        }

        if target.named == Some(TypeId::ANY) {
            return Ok(true);
        }

        if self.as_foreign(source.ty).is_some() {
            return self.foreign_conforms(source, target);
        }

        if let Some(foreign) = self.as_foreign(target.ty) {
            return match foreign.descriptor.bridge {
                Some(bridge) => Ok(same_identity(&self.resolve(bridge)?, source)),
                None => Ok(false),
            };
        }

        match self.get(source.ty) {
            // A Named type and the node it is bound to are one type.
            TypeInfo::Record(_) | TypeInfo::Custom(_) | TypeInfo::Handler(_)
                if source.ty == target.ty =>
            {
                Ok(true)
            }
            // No structural subtyping for records.
            TypeInfo::Record(_) => Ok(false),
            TypeInfo::Custom(custom) => self.custom_conforms(custom.base, target),
            TypeInfo::Handler(handler) => match self.as_handler(target.ty) {
                Some(expected) => ensure_sufficient_stack(|| {
                    self.handler_conforms(handler, expected, depth + 1, assumed)
                }),
                None => Ok(false),
            },
            _ => Ok(false),
        }
    }

    fn foreign_conforms(&self, source: &ResolvedType, target: &ResolvedType) -> RuntimeResult<bool> {
        if source.ty == target.ty {
            return Ok(true);
        }
        let Some(foreign) = self.as_foreign(source.ty) else {
            return Ok(false);
        };
        let descriptor = &foreign.descriptor;

        if let Some(expected) = self.as_foreign(target.ty) {
            if descriptor.bridge.is_some() && descriptor.bridge == expected.descriptor.bridge {
                return Ok(true);
            }
        }

        if let Some(bridge) = descriptor.bridge {
            if same_identity(&self.resolve(bridge)?, target) {
                return Ok(true);
            }
        }

        let mut base = descriptor.base;
        let mut steps = 0;
        while let Some(current) = base {
            steps += 1;
            if steps > self.config().max_resolve_depth {
                return Err(RuntimeError::RecursionLimit { depth: steps });
            }
            let resolved = self.resolve(current)?;
            if same_identity(&resolved, target) || resolved.ty == target.ty {
                return Ok(true);
            }
            base = self
                .as_foreign(resolved.ty)
                .and_then(|foreign| foreign.descriptor.base);
        }
        Ok(false)
    }

    fn custom_conforms(&self, base: TypeId, target: &ResolvedType) -> RuntimeResult<bool> {
        let mut current = base;
        for _ in 0..=self.config().max_resolve_depth {
            let resolved = self.resolve(current)?;
            // A custom type rooted at undefined has no further ancestors.
            if resolved.named == Some(TypeId::NULL) {
                return Ok(false);
            }
            if same_identity(&resolved, target) || resolved.ty == target.ty {
                return Ok(true);
            }
            match self.as_custom(resolved.ty) {
                Some(custom) => current = custom.base,
                None => return Ok(false),
            }
        }
        Err(RuntimeError::RecursionLimit {
            depth: self.config().max_resolve_depth,
        })
    }

    /// Returns covariant, parameters by mode: `in` covariant, `out`
    /// contravariant, `inout` both. Modes must match exactly.
    fn handler_conforms(
        &self,
        source: &HandlerInfo,
        target: &HandlerInfo,
        depth: usize,
        assumed: &mut Assumptions,
    ) -> RuntimeResult<bool> {
        if source.params.len() != target.params.len() {
            return Ok(false);
        }
        if !self.type_conforms_at(source.ret, target.ret, depth, assumed)? {
            return Ok(false);
        }

        for (from, to) in source.params.iter().zip(&target.params) {
            if from.mode != to.mode {
                return Ok(false);
            }
            let conforms = match from.mode {
                ParamMode::In | ParamMode::Variadic => {
                    self.type_conforms_at(from.ty, to.ty, depth, assumed)?
                }
                ParamMode::Out => self.type_conforms_at(to.ty, from.ty, depth, assumed)?,
                ParamMode::InOut => {
                    self.type_conforms_at(from.ty, to.ty, depth, assumed)?
                        && self.type_conforms_at(to.ty, from.ty, depth, assumed)?
                }
            };
            if !conforms {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
