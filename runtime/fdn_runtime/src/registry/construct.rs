//! Type construction.
//!
//! Every constructor interns by structural content except foreign and
//! custom types (always fresh) and aliases with an empty name.

use std::sync::Arc;

use fdn_ir::Name;

use crate::data::InternKey;
use crate::foreign::{ForeignDescriptor, ForeignInfo};
use crate::{
    Binding, BuiltinCode, CustomCallbacks, CustomInfo, HandlerFlags, HandlerInfo, HandlerParam,
    Mismatch, ParamMode, RecordField, RecordInfo, RuntimeError, RuntimeResult, TypeId, TypeInfo,
    TypeRegistry,
};

impl TypeRegistry {
    /// The bare builtin node for `code`.
    ///
    /// Builtin nodes exist from registry creation; use
    /// [`TypeId::builtin`] for the Named form values are typed by.
    pub fn create_builtin(&self, code: BuiltinCode) -> TypeId {
        TypeId::builtin_node(code)
    }

    /// An alias naming `target`. Aliases with an empty name are never
    /// shared.
    pub fn create_alias(&mut self, name: &str, target: TypeId) -> RuntimeResult<TypeId> {
        let name = self.names().intern(name);
        let info = TypeInfo::Alias { name, target };
        if name.is_empty() {
            return self.alloc(info);
        }
        let key = InternKey::Alias {
            name: self.names().fold(name),
            target,
        };
        self.intern(key, || info)
    }

    /// The Named type called `name`, ignoring case. Creates it unbound on
    /// first use.
    pub fn create_named(&mut self, name: &str) -> RuntimeResult<TypeId> {
        let name = self.names().intern(name);
        let key = InternKey::Named(self.names().fold(name));
        self.intern(key, || TypeInfo::Named {
            name,
            binding: Binding::Unbound,
        })
    }

    /// Bind a Named type to its target. Fails if already bound.
    pub fn bind_named(&mut self, named: TypeId, target: TypeId) -> RuntimeResult<()> {
        let names = self.names();
        let (name, binding) = match self.get(named) {
            TypeInfo::Named { name, binding } => (*name, *binding),
            _ => return Err(Mismatch::WrongTypeKind { expected: "named" }.into()),
        };
        if binding != Binding::Unbound {
            return Err(RuntimeError::AlreadyBound {
                name: names.lookup(name),
            });
        }
        tracing::debug!(?named, ?target, name = names.lookup(name), "bind named type");
        self.set_binding(named, Binding::Bound(target));
        Ok(())
    }

    /// Remove a Named type's target. Fails if unbound, and for the
    /// builtin Named types, which everything else resolves through.
    pub fn unbind_named(&mut self, named: TypeId) -> RuntimeResult<()> {
        let names = self.names();
        let (name, binding) = match self.get(named) {
            TypeInfo::Named { name, binding } => (*name, *binding),
            _ => return Err(Mismatch::WrongTypeKind { expected: "named" }.into()),
        };
        if self.is_permanent(named) {
            return Err(RuntimeError::PermanentBinding {
                name: names.lookup(name),
            });
        }
        if binding == Binding::Unbound {
            return Err(RuntimeError::NotBound {
                name: names.lookup(name),
            });
        }
        tracing::debug!(?named, name = names.lookup(name), "unbind named type");
        self.set_binding(named, Binding::Unbound);
        Ok(())
    }

    /// `base` made optional. Optional of optional is the inner optional.
    pub fn create_optional(&mut self, base: TypeId) -> RuntimeResult<TypeId> {
        if matches!(self.get(base), TypeInfo::Optional { .. }) {
            return Ok(base);
        }
        self.intern(InternKey::Optional(base), || TypeInfo::Optional { base })
    }

    /// A new foreign type. The native layout is computed and checked here,
    /// once.
    pub fn create_foreign(&mut self, descriptor: ForeignDescriptor) -> RuntimeResult<TypeId> {
        let native = descriptor.validate()?;
        let codec = descriptor.codec.name();
        let id = self.alloc(TypeInfo::Foreign(Box::new(ForeignInfo { descriptor, native })))?;
        tracing::debug!(?id, codec, "create foreign type");
        Ok(id)
    }

    /// A record type. Field names must be unique ignoring case.
    pub fn create_record(&mut self, fields: &[(&str, TypeId)]) -> RuntimeResult<TypeId> {
        let mut declared = Vec::new();
        declared
            .try_reserve_exact(fields.len())
            .map_err(|_| RuntimeError::OutOfMemory)?;
        let mut key: Vec<(Name, TypeId)> = Vec::with_capacity(fields.len());

        for &(spelling, ty) in fields {
            let name = self.names().intern(spelling);
            let folded = self.names().fold(name);
            if key.iter().any(|&(existing, _)| existing == folded) {
                return Err(Mismatch::DuplicateField {
                    field: self.names().lookup(name),
                }
                .into());
            }
            key.push((folded, ty));
            declared.push(RecordField::new(name, ty));
        }

        self.intern(InternKey::Record(key), || {
            TypeInfo::Record(RecordInfo { fields: declared })
        })
    }

    /// A handler type. Only the last parameter may be variadic.
    pub fn create_handler(
        &mut self,
        params: &[HandlerParam],
        ret: TypeId,
        is_foreign: bool,
    ) -> RuntimeResult<TypeId> {
        let last = params.len().saturating_sub(1);
        if let Some(index) = params
            .iter()
            .position(|param| param.mode == ParamMode::Variadic)
            .filter(|&index| index != last)
        {
            return Err(Mismatch::VariadicNotLast { index }.into());
        }

        let mut flags = HandlerFlags::empty();
        flags.set(HandlerFlags::FOREIGN, is_foreign);
        flags.set(
            HandlerFlags::VARIADIC,
            params
                .last()
                .is_some_and(|param| param.mode == ParamMode::Variadic),
        );

        let key = InternKey::Handler {
            params: params.to_vec(),
            ret,
            flags,
        };
        self.intern(key, || {
            TypeInfo::Handler(HandlerInfo {
                params: params.to_vec(),
                ret,
                flags,
                call_cache: Vec::new(),
            })
        })
    }

    /// An error type: a domain and a message template with `%{key}`
    /// placeholders.
    pub fn create_error(&mut self, domain: &str, message: &str) -> RuntimeResult<TypeId> {
        let domain = self.names().intern(domain);
        let key = InternKey::Error {
            domain: self.names().fold(domain),
            message: message.into(),
        };
        self.intern(key, || TypeInfo::Error {
            domain,
            message: message.into(),
        })
    }

    /// A new custom type. Never shared, even for identical callbacks.
    pub fn create_custom(
        &mut self,
        base: TypeId,
        callbacks: Arc<dyn CustomCallbacks>,
    ) -> RuntimeResult<TypeId> {
        let id = self.alloc(TypeInfo::Custom(CustomInfo { base, callbacks }))?;
        tracing::debug!(?id, ?base, "create custom type");
        Ok(id)
    }
}
