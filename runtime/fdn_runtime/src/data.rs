//! Type node payloads.
//!
//! One [`TypeInfo`] per arena slot. Nodes are immutable once created,
//! except the [`Binding`] of a Named node and a handler's call-layout
//! cache.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use fdn_ir::Name;

use crate::foreign::ForeignInfo;
use crate::{Abi, BuiltinCode, CallSignature, CustomCallbacks, TypeId};

/// Target state of a Named type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Unbound,
    Bound(TypeId),
}

/// How a handler parameter is passed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamMode {
    In,
    Out,
    InOut,
    /// Absorbs the remaining arguments. Only valid last.
    Variadic,
}

impl ParamMode {
    pub const fn name(self) -> &'static str {
        match self {
            ParamMode::In => "in",
            ParamMode::Out => "out",
            ParamMode::InOut => "inout",
            ParamMode::Variadic => "variadic",
        }
    }
}

/// One handler parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerParam {
    pub mode: ParamMode,
    pub ty: TypeId,
}

impl HandlerParam {
    pub const fn new(mode: ParamMode, ty: TypeId) -> Self {
        HandlerParam { mode, ty }
    }

    pub const fn input(ty: TypeId) -> Self {
        Self::new(ParamMode::In, ty)
    }

    pub const fn output(ty: TypeId) -> Self {
        Self::new(ParamMode::Out, ty)
    }
}

bitflags! {
    /// Handler properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct HandlerFlags: u8 {
        /// Called through a native ABI.
        const FOREIGN = 1 << 0;
        /// The last parameter is variadic.
        const VARIADIC = 1 << 1;
    }
}

/// One record field. `name` keeps the declared spelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecordField {
    pub name: Name,
    pub ty: TypeId,
}

impl RecordField {
    pub const fn new(name: Name, ty: TypeId) -> Self {
        RecordField { name, ty }
    }
}

#[derive(Clone, Debug)]
pub struct RecordInfo {
    pub fields: Vec<RecordField>,
}

#[derive(Clone, Debug)]
pub struct HandlerInfo {
    pub params: Vec<HandlerParam>,
    pub ret: TypeId,
    pub flags: HandlerFlags,
    /// Call layouts built so far, one per ABI.
    pub(crate) call_cache: Vec<(Abi, Arc<CallSignature>)>,
}

impl HandlerInfo {
    pub fn is_foreign(&self) -> bool {
        self.flags.contains(HandlerFlags::FOREIGN)
    }

    pub fn is_variadic(&self) -> bool {
        self.flags.contains(HandlerFlags::VARIADIC)
    }
}

#[derive(Clone)]
pub struct CustomInfo {
    pub base: TypeId,
    pub callbacks: Arc<dyn CustomCallbacks>,
}

impl fmt::Debug for CustomInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomInfo")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// A type node.
#[derive(Clone, Debug)]
pub enum TypeInfo {
    Builtin(BuiltinCode),
    /// Debug wrapper naming another type.
    Alias { name: Name, target: TypeId },
    /// Nominal type, identified by its caseless name.
    Named { name: Name, binding: Binding },
    /// Accepts undefined in addition to `base`.
    Optional { base: TypeId },
    Foreign(Box<ForeignInfo>),
    Record(RecordInfo),
    Handler(HandlerInfo),
    Error { domain: Name, message: Box<str> },
    Custom(CustomInfo),
}

impl TypeInfo {
    /// Variant name, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeInfo::Builtin(_) => "builtin",
            TypeInfo::Alias { .. } => "alias",
            TypeInfo::Named { .. } => "named",
            TypeInfo::Optional { .. } => "optional",
            TypeInfo::Foreign(_) => "foreign",
            TypeInfo::Record(_) => "record",
            TypeInfo::Handler(_) => "handler",
            TypeInfo::Error { .. } => "error",
            TypeInfo::Custom(_) => "custom",
        }
    }
}

/// Structural identity of an interned node.
///
/// Names are stored folded, so keys differing only in case collide.
/// Foreign and custom types, and aliases with an empty name, have no key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum InternKey {
    Builtin(BuiltinCode),
    Alias { name: Name, target: TypeId },
    Named(Name),
    Optional(TypeId),
    Record(Vec<(Name, TypeId)>),
    Handler {
        params: Vec<HandlerParam>,
        ret: TypeId,
        flags: HandlerFlags,
    },
    Error { domain: Name, message: Box<str> },
}
