//! Type handle.
//!
//! `TypeId` is a 32-bit index into a [`TypeRegistry`](crate::TypeRegistry)'s
//! node arena. Interned types compare structurally by comparing ids.
//!
//! The first nodes of every registry are fixed:
//! - `0..11`: the bare builtin nodes, one per [`BuiltinCode`]
//! - `11..22`: the `builtin.*` Named types bound to them
//!
//! The public constants name the Named builtins, since conformance
//! compares named identity.

use std::fmt;

use crate::BuiltinCode;

/// A 32-bit index into the type arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

#[allow(
    clippy::cast_possible_truncation,
    reason = "builtin counts are tiny compile-time constants"
)]
const NAMED_BASE: u32 = BuiltinCode::COUNT as u32;

impl TypeId {
    // === Named builtins (indices 11-21) ===

    /// `builtin.Null`, the type of undefined.
    pub const NULL: Self = Self::builtin(BuiltinCode::Null);
    /// `builtin.Boolean`.
    pub const BOOLEAN: Self = Self::builtin(BuiltinCode::Boolean);
    /// `builtin.Number`.
    pub const NUMBER: Self = Self::builtin(BuiltinCode::Number);
    /// `builtin.String`.
    pub const STRING: Self = Self::builtin(BuiltinCode::String);
    /// `builtin.Name`.
    pub const NAME: Self = Self::builtin(BuiltinCode::Name);
    /// `builtin.Data`.
    pub const DATA: Self = Self::builtin(BuiltinCode::Data);
    /// `builtin.Array`.
    pub const ARRAY: Self = Self::builtin(BuiltinCode::Array);
    /// `builtin.Set`.
    pub const SET: Self = Self::builtin(BuiltinCode::Set);
    /// `builtin.List`.
    pub const LIST: Self = Self::builtin(BuiltinCode::List);
    /// `builtin.ProperList`.
    pub const PROPER_LIST: Self = Self::builtin(BuiltinCode::ProperList);
    /// `builtin.Any`. Bound to an optional, so undefined conforms to it.
    pub const ANY: Self = Self::builtin(BuiltinCode::Any);

    /// First index handed out for user-constructed types.
    pub const FIRST_DYNAMIC: u32 = NAMED_BASE * 2;

    /// The bare builtin node for `code`.
    #[inline]
    pub const fn builtin_node(code: BuiltinCode) -> Self {
        Self(code as u32)
    }

    /// The `builtin.*` Named type for `code`.
    #[inline]
    pub const fn builtin(code: BuiltinCode) -> Self {
        Self(NAMED_BASE + code as u32)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-registered builtin ids.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// The builtin code behind a pre-registered id, bare or named.
    pub const fn builtin_code(self) -> Option<BuiltinCode> {
        if !self.is_builtin() {
            return None;
        }
        let index = (self.0 % NAMED_BASE) as usize;
        Some(BuiltinCode::ALL[index])
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_code() {
            Some(code) if self.0 >= NAMED_BASE => write!(f, "TypeId({})", code.qualified_name()),
            Some(code) => write!(f, "TypeId({})", code.name()),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<TypeId>() == 4);
