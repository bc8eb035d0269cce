//! The value kernel.
//!
//! `Value` is a cheap-to-clone handle: scalars inline, everything else in
//! a shared [`Heap`]. Values are immutable once built; a mutable record is
//! a [`RecordValue`] the caller owns until it is frozen into a `Value`.
//!
//! # Factory methods
//!
//! Boxed kinds are only allocated through the constructors here
//! (`Value::string`, `Value::data`, `Value::record`, ...), never by
//! building a `Heap` directly.

mod array;
mod heap;
mod intern;
mod number;

use std::fmt;
use std::sync::Arc;

use fdn_ir::{hash_bytes, hash_integer, HashCode, HashStream, Name};

use crate::{CustomValue, ErrorValue, ForeignValue, RecordValue, TypeId};

pub use array::ArrayValue;
pub use heap::Heap;
pub use intern::ValueTable;
pub use number::Number;

/// Discriminant of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Name,
    Data,
    Array,
    Set,
    List,
    ProperList,
    Record,
    Foreign,
    Custom,
    Error,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "undefined",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Name => "name",
            ValueKind::Data => "data",
            ValueKind::Array => "array",
            ValueKind::Set => "set",
            ValueKind::List => "list",
            ValueKind::ProperList => "proper list",
            ValueKind::Record => "record",
            ValueKind::Foreign => "foreign",
            ValueKind::Custom => "custom",
            ValueKind::Error => "error",
        }
    }

    /// Whether a [`ValueTable`] canonicalizes values of this kind.
    pub const fn is_internable(self) -> bool {
        !matches!(
            self,
            ValueKind::Record | ValueKind::Foreign | ValueKind::Custom | ValueKind::Error
        )
    }
}

/// A runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Undefined.
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(Heap<str>),
    Name(Name),
    Data(Heap<[u8]>),
    Array(Heap<ArrayValue>),
    /// Sorted, deduplicated indices.
    Set(Heap<[u32]>),
    /// List of strings.
    List(Heap<[Box<str>]>),
    ProperList(Heap<[Value]>),
    Record(Heap<RecordValue>),
    Foreign(Heap<ForeignValue>),
    Custom(Heap<CustomValue>),
    Error(Heap<ErrorValue>),
}

impl Value {
    // === Factories ===

    #[inline]
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    #[inline]
    pub fn integer(i: i32) -> Self {
        Value::Number(Number::Integer(i))
    }

    #[inline]
    pub fn real(r: f64) -> Self {
        Value::Number(Number::Real(r))
    }

    #[inline]
    pub fn number(n: Number) -> Self {
        Value::Number(n)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Heap::from_arc(Arc::from(s.as_ref())))
    }

    #[inline]
    pub fn name(name: Name) -> Self {
        Value::Name(name)
    }

    pub fn data(bytes: &[u8]) -> Self {
        Value::Data(Heap::from_arc(Arc::from(bytes)))
    }

    pub fn array(array: ArrayValue) -> Self {
        Value::Array(Heap::new(array))
    }

    pub fn set(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut indices: Vec<u32> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Value::Set(Heap::from_arc(Arc::from(indices)))
    }

    pub fn list<S: Into<Box<str>>>(items: impl IntoIterator<Item = S>) -> Self {
        let items: Vec<Box<str>> = items.into_iter().map(Into::into).collect();
        Value::List(Heap::from_arc(Arc::from(items)))
    }

    pub fn proper_list(items: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = items.into_iter().collect();
        Value::ProperList(Heap::from_arc(Arc::from(items)))
    }

    /// Freeze a record into a value.
    pub fn record(record: RecordValue) -> Self {
        Value::Record(Heap::new(record.into_frozen()))
    }

    pub(crate) fn foreign(foreign: ForeignValue) -> Self {
        Value::Foreign(Heap::new(foreign))
    }

    pub(crate) fn custom(custom: CustomValue) -> Self {
        Value::Custom(Heap::new(custom))
    }

    pub(crate) fn error(error: ErrorValue) -> Self {
        Value::Error(Heap::new(error))
    }

    // === Queries ===

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Name(_) => ValueKind::Name,
            Value::Data(_) => ValueKind::Data,
            Value::Array(_) => ValueKind::Array,
            Value::Set(_) => ValueKind::Set,
            Value::List(_) => ValueKind::List,
            Value::ProperList(_) => ValueKind::ProperList,
            Value::Record(_) => ValueKind::Record,
            Value::Foreign(_) => ValueKind::Foreign,
            Value::Custom(_) => ValueKind::Custom,
            Value::Error(_) => ValueKind::Error,
        }
    }

    /// The dynamic type of this value.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Null => TypeId::NULL,
            Value::Boolean(_) => TypeId::BOOLEAN,
            Value::Number(_) => TypeId::NUMBER,
            Value::String(_) => TypeId::STRING,
            Value::Name(_) => TypeId::NAME,
            Value::Data(_) => TypeId::DATA,
            Value::Array(_) => TypeId::ARRAY,
            Value::Set(_) => TypeId::SET,
            Value::List(_) => TypeId::LIST,
            Value::ProperList(_) => TypeId::PROPER_LIST,
            Value::Record(record) => record.type_id(),
            Value::Foreign(foreign) => foreign.type_id(),
            Value::Custom(custom) => custom.type_id(),
            Value::Error(error) => error.type_id(),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_foreign(&self) -> Option<&ForeignValue> {
        match self {
            Value::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            Value::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(error) => Some(error),
            _ => None,
        }
    }

    // === Identity ===

    /// Content equality.
    ///
    /// Numbers compare numerically; arrays ignore key case and order;
    /// foreign and custom values defer to their callbacks.
    pub fn equals(&self, other: &Value) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => **a == **b,
            (Value::Name(a), Value::Name(b)) => a == b,
            (Value::Data(a), Value::Data(b)) => **a == **b,
            (Value::Array(a), Value::Array(b)) => a.equals(b),
            (Value::Set(a), Value::Set(b)) => **a == **b,
            (Value::List(a), Value::List(b)) => **a == **b,
            (Value::ProperList(a), Value::ProperList(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Record(a), Value::Record(b)) => a.equals(b),
            (Value::Foreign(a), Value::Foreign(b)) => a.equals(b),
            (Value::Custom(a), Value::Custom(b)) => a.equals(b),
            (Value::Error(a), Value::Error(b)) => a.equals(b),
            _ => false,
        }
    }

    /// Hash consistent with [`equals`](Self::equals).
    pub fn hash_code(&self) -> HashCode {
        let payload = match self {
            Value::Null => 0,
            Value::Boolean(b) => hash_integer(i64::from(*b)),
            Value::Number(n) => n.hash_code(),
            Value::String(s) => hash_bytes(s.as_bytes()),
            Value::Name(name) => hash_integer(i64::from(name.raw())),
            Value::Data(bytes) => hash_bytes(bytes),
            Value::Array(array) => array.hash_code(),
            Value::Set(indices) => indices
                .iter()
                .fold(HashStream::new(), |stream, &i| stream.integer(i64::from(i)))
                .finish(),
            Value::List(items) => items
                .iter()
                .fold(HashStream::new(), |stream, item| stream.bytes(item.as_bytes()))
                .finish(),
            Value::ProperList(items) => items
                .iter()
                .fold(HashStream::new(), |stream, item| stream.hash(item.hash_code()))
                .finish(),
            Value::Record(record) => record.hash_code(),
            Value::Foreign(foreign) => foreign.hash_code(),
            Value::Custom(custom) => custom.hash_code(),
            Value::Error(error) => error.hash_code(),
        };
        HashStream::new()
            .integer(self.kind() as i64)
            .hash(payload)
            .finish()
    }

    /// References to the payload; 1 for inline scalars.
    pub fn ref_count(&self) -> usize {
        match self {
            Value::Null | Value::Boolean(_) | Value::Number(_) | Value::Name(_) => 1,
            Value::String(s) => s.ref_count(),
            Value::Data(d) => d.ref_count(),
            Value::Array(a) => a.ref_count(),
            Value::Set(s) => s.ref_count(),
            Value::List(l) => l.ref_count(),
            Value::ProperList(l) => l.ref_count(),
            Value::Record(r) => r.ref_count(),
            Value::Foreign(f) => f.ref_count(),
            Value::Custom(c) => c.ref_count(),
            Value::Error(e) => e.ref_count(),
        }
    }

    /// Same allocation for boxed kinds; same content for inline scalars.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                a.is_integer() == b.is_integer() && a.as_f64().to_bits() == b.as_f64().to_bits()
            }
            (Value::Name(a), Value::Name(b)) => a == b,
            (Value::String(a), Value::String(b)) => a.ptr_eq(b),
            (Value::Data(a), Value::Data(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::ProperList(a), Value::ProperList(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Foreign(a), Value::Foreign(b)) => a.ptr_eq(b),
            (Value::Custom(a), Value::Custom(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::real(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// Plain-text rendering, as substituted into error messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Name(name) => write!(f, "{name:?}"),
            Value::Data(bytes) => write!(f, "<data {} bytes>", bytes.len()),
            Value::Array(array) => write!(f, "<array {} entries>", array.len()),
            Value::Set(indices) => write!(f, "<set {} indices>", indices.len()),
            Value::List(items) => f.write_str(&items.join(",")),
            Value::ProperList(items) => write!(f, "<list {} items>", items.len()),
            Value::Record(record) => write!(f, "<record {} fields>", record.len()),
            Value::Foreign(foreign) => f.write_str(&foreign.describe()),
            Value::Custom(custom) => f.write_str(&custom.describe()),
            Value::Error(error) => f.write_str(error.message()),
        }
    }
}
