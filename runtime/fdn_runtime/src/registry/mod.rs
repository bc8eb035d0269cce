//! The type registry.
//!
//! An arena of [`TypeInfo`] nodes addressed by [`TypeId`], plus the
//! interning table that makes structurally equal types share one id.
//! A registry is a single-owner context: construction and binding take
//! `&mut self`, queries take `&self`. Wrap it in a [`SharedTypeRegistry`]
//! to use it from several threads.

mod construct;
mod format;

use std::sync::Arc;

use fdn_ir::{Name, NameTable};
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;

use crate::data::InternKey;
use crate::foreign::{ForeignDescriptor, ForeignInfo, NativeType};
use crate::{
    Binding, BuiltinCode, CustomInfo, ForeignKind, HandlerInfo, RecordInfo, RegistryConfig,
    RuntimeError, RuntimeResult, TypeId, TypeInfo,
};

/// Owner of every type node.
pub struct TypeRegistry {
    types: Vec<TypeInfo>,
    interned: FxHashMap<InternKey, TypeId>,
    names: NameTable,
    config: RegistryConfig,
    foreign_types: [TypeId; ForeignKind::COUNT],
}

impl TypeRegistry {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the builtin and builtin foreign types
    /// pre-registered.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = TypeRegistry {
            types: Vec::with_capacity(128),
            interned: FxHashMap::default(),
            names: NameTable::new(),
            config,
            foreign_types: [TypeId::NULL; ForeignKind::COUNT],
        };
        registry.register_builtins();
        registry.register_foreign_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        for code in BuiltinCode::ALL {
            let id = self.push_node(TypeInfo::Builtin(code));
            self.interned.insert(InternKey::Builtin(code), id);
            debug_assert_eq!(id, TypeId::builtin_node(code));
        }
        for code in BuiltinCode::ALL {
            let name = self.names.intern(code.qualified_name());
            let id = self.push_node(TypeInfo::Named {
                name,
                binding: Binding::Unbound,
            });
            self.interned
                .insert(InternKey::Named(self.names.fold(name)), id);
            debug_assert_eq!(id, TypeId::builtin(code));
        }
        for code in BuiltinCode::ALL {
            let node = TypeId::builtin_node(code);
            let target = if code == BuiltinCode::Any {
                let optional = self.push_node(TypeInfo::Optional { base: node });
                self.interned.insert(InternKey::Optional(node), optional);
                optional
            } else {
                node
            };
            self.set_binding(TypeId::builtin(code), Binding::Bound(target));
        }
    }

    fn register_foreign_builtins(&mut self) {
        for kind in ForeignKind::ALL {
            let primitive = kind.primitive();
            let mut descriptor = ForeignDescriptor::primitive(primitive, kind.codec());
            descriptor.bridge = kind.bridge();
            let node = self.push_node(TypeInfo::Foreign(Box::new(ForeignInfo {
                descriptor,
                native: NativeType::Primitive(primitive),
            })));

            let name = self.names.intern(kind.qualified_name());
            let named = self.push_node(TypeInfo::Named {
                name,
                binding: Binding::Bound(node),
            });
            self.interned
                .insert(InternKey::Named(self.names.fold(name)), named);
            self.foreign_types[kind.index()] = named;
        }
    }

    fn push_node(&mut self, info: TypeInfo) -> TypeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "an arena never approaches u32::MAX nodes"
        )]
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(info);
        id
    }

    /// Append a node, reporting allocation failure.
    fn alloc(&mut self, info: TypeInfo) -> RuntimeResult<TypeId> {
        self.types
            .try_reserve(1)
            .map_err(|_| RuntimeError::OutOfMemory)?;
        Ok(self.push_node(info))
    }

    /// Return the node interned under `key`, or create it.
    fn intern(
        &mut self,
        key: InternKey,
        make: impl FnOnce() -> TypeInfo,
    ) -> RuntimeResult<TypeId> {
        if let Some(&id) = self.interned.get(&key) {
            tracing::trace!(?id, "intern hit");
            return Ok(id);
        }
        self.interned
            .try_reserve(1)
            .map_err(|_| RuntimeError::OutOfMemory)?;
        let id = self.alloc(make())?;
        tracing::trace!(?id, "intern miss");
        self.interned.insert(key, id);
        Ok(id)
    }

    fn set_binding(&mut self, named: TypeId, new: Binding) {
        if let TypeInfo::Named { binding, .. } = &mut self.types[named.index()] {
            *binding = new;
        }
    }

    // === Queries ===

    /// The node behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this registry.
    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut TypeInfo {
        &mut self.types[id.index()]
    }

    /// Number of nodes, builtins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: builtins are registered at construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Identifier table shared by types and values of this registry.
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Intern an identifier in this registry's name table.
    pub fn intern_name(&self, spelling: &str) -> Name {
        self.names.intern(spelling)
    }

    /// Spelling of an identifier interned here.
    pub fn name_str(&self, name: Name) -> &'static str {
        self.names.lookup(name)
    }

    /// The pre-registered Named type for a builtin foreign kind.
    pub fn foreign_type(&self, kind: ForeignKind) -> TypeId {
        self.foreign_types[kind.index()]
    }

    /// Registered by the registry itself; its binding never changes.
    pub fn is_permanent(&self, id: TypeId) -> bool {
        id.is_builtin() || self.foreign_types.contains(&id)
    }

    // === Accessors ===
    // Each returns `None` when `id` is a different variant.

    pub fn as_record(&self, id: TypeId) -> Option<&RecordInfo> {
        match self.get(id) {
            TypeInfo::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_handler(&self, id: TypeId) -> Option<&HandlerInfo> {
        match self.get(id) {
            TypeInfo::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn as_foreign(&self, id: TypeId) -> Option<&ForeignInfo> {
        match self.get(id) {
            TypeInfo::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }

    pub fn as_custom(&self, id: TypeId) -> Option<&CustomInfo> {
        match self.get(id) {
            TypeInfo::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    pub fn named_name(&self, id: TypeId) -> Option<&'static str> {
        match self.get(id) {
            TypeInfo::Named { name, .. } => Some(self.names.lookup(*name)),
            _ => None,
        }
    }

    pub fn is_bound(&self, id: TypeId) -> bool {
        self.bound_target(id).is_some()
    }

    pub fn bound_target(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeInfo::Named {
                binding: Binding::Bound(target),
                ..
            } => Some(*target),
            _ => None,
        }
    }

    pub fn alias_target(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeInfo::Alias { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn optional_base(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeInfo::Optional { base } => Some(*base),
            _ => None,
        }
    }

    pub fn error_domain(&self, id: TypeId) -> Option<&'static str> {
        match self.get(id) {
            TypeInfo::Error { domain, .. } => Some(self.names.lookup(*domain)),
            _ => None,
        }
    }

    pub fn error_message(&self, id: TypeId) -> Option<&str> {
        match self.get(id) {
            TypeInfo::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("interned", &self.interned.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A registry behind a lock, for callers that share one type universe
/// across threads.
///
/// Every operation, including resolution and conformance, must happen
/// under the lock.
#[derive(Clone, Default)]
pub struct SharedTypeRegistry {
    inner: Arc<Mutex<TypeRegistry>>,
}

impl SharedTypeRegistry {
    pub fn new(registry: TypeRegistry) -> Self {
        SharedTypeRegistry {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Lock the registry for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, TypeRegistry> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut TypeRegistry) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl std::fmt::Debug for SharedTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTypeRegistry").finish_non_exhaustive()
    }
}
