//! Type resolution.
//!
//! Walks alias, named and optional layers down to a concrete node.

use crate::{Binding, RuntimeError, RuntimeResult, TypeId, TypeInfo, TypeRegistry};

/// A type reference reduced to its concrete node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    /// The outermost Named type passed through, if any.
    pub named: Option<TypeId>,
    /// The concrete node: never an alias, named or optional.
    pub ty: TypeId,
    /// An optional layer was crossed, so undefined is acceptable.
    pub is_optional: bool,
}

impl TypeRegistry {
    /// Resolve `id` to its concrete form.
    ///
    /// Fails with `UnboundType` at an unbound Named type and with
    /// `RecursionLimit` if the chain is longer than the configured depth
    /// (a Named type bound, directly or not, to itself).
    pub fn resolve(&self, id: TypeId) -> RuntimeResult<ResolvedType> {
        let mut named = None;
        let mut is_optional = false;
        let mut current = id;

        for _ in 0..=self.config().max_resolve_depth {
            match self.get(current) {
                TypeInfo::Alias { target, .. } => current = *target,
                TypeInfo::Named { name, binding } => match binding {
                    Binding::Bound(target) => {
                        named.get_or_insert(current);
                        current = *target;
                    }
                    Binding::Unbound => {
                        return Err(RuntimeError::UnboundType {
                            name: self.name_str(*name),
                        });
                    }
                },
                TypeInfo::Optional { base } => {
                    is_optional = true;
                    current = *base;
                }
                _ => {
                    return Ok(ResolvedType {
                        named,
                        ty: current,
                        is_optional,
                    });
                }
            }
        }

        Err(RuntimeError::RecursionLimit {
            depth: self.config().max_resolve_depth,
        })
    }

    /// Resolve and return only the concrete node.
    pub fn resolve_concrete(&self, id: TypeId) -> RuntimeResult<TypeId> {
        self.resolve(id).map(|resolved| resolved.ty)
    }
}
