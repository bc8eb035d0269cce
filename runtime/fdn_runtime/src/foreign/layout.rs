//! Native ABI layouts.
//!
//! The layout builder: foreign descriptors are turned into [`NativeType`]s
//! (a single primitive or a C struct of primitives) and handler types into
//! [`CallSignature`]s. Nothing here performs a call; a native-call
//! backend consumes these descriptions.
//!
//! Sizes and alignments are those of the compilation target.

use std::fmt;
use std::mem::{align_of, size_of};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::{Abi, RuntimeError, RuntimeResult};

/// A machine primitive in a foreign layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForeignPrimitive {
    Bool,
    UInt8,
    SInt8,
    UInt16,
    SInt16,
    UInt32,
    SInt32,
    UInt64,
    SInt64,
    Float32,
    Float64,
    Pointer,
}

impl ForeignPrimitive {
    /// The unsigned primitive matching `usize`.
    #[cfg(target_pointer_width = "64")]
    pub const USIZE: Self = ForeignPrimitive::UInt64;
    #[cfg(target_pointer_width = "32")]
    pub const USIZE: Self = ForeignPrimitive::UInt32;
    #[cfg(target_pointer_width = "16")]
    pub const USIZE: Self = ForeignPrimitive::UInt16;

    /// The signed primitive matching `isize`.
    #[cfg(target_pointer_width = "64")]
    pub const ISIZE: Self = ForeignPrimitive::SInt64;
    #[cfg(target_pointer_width = "32")]
    pub const ISIZE: Self = ForeignPrimitive::SInt32;
    #[cfg(target_pointer_width = "16")]
    pub const ISIZE: Self = ForeignPrimitive::SInt16;

    pub const fn size(self) -> usize {
        match self {
            ForeignPrimitive::Bool => size_of::<bool>(),
            ForeignPrimitive::UInt8 | ForeignPrimitive::SInt8 => size_of::<u8>(),
            ForeignPrimitive::UInt16 | ForeignPrimitive::SInt16 => size_of::<u16>(),
            ForeignPrimitive::UInt32 | ForeignPrimitive::SInt32 => size_of::<u32>(),
            ForeignPrimitive::UInt64 | ForeignPrimitive::SInt64 => size_of::<u64>(),
            ForeignPrimitive::Float32 => size_of::<f32>(),
            ForeignPrimitive::Float64 => size_of::<f64>(),
            ForeignPrimitive::Pointer => size_of::<usize>(),
        }
    }

    pub const fn align(self) -> usize {
        match self {
            ForeignPrimitive::Bool => align_of::<bool>(),
            ForeignPrimitive::UInt8 | ForeignPrimitive::SInt8 => align_of::<u8>(),
            ForeignPrimitive::UInt16 | ForeignPrimitive::SInt16 => align_of::<u16>(),
            ForeignPrimitive::UInt32 | ForeignPrimitive::SInt32 => align_of::<u32>(),
            ForeignPrimitive::UInt64 | ForeignPrimitive::SInt64 => align_of::<u64>(),
            ForeignPrimitive::Float32 => align_of::<f32>(),
            ForeignPrimitive::Float64 => align_of::<f64>(),
            ForeignPrimitive::Pointer => align_of::<usize>(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ForeignPrimitive::Bool => "bool",
            ForeignPrimitive::UInt8 => "uint8",
            ForeignPrimitive::SInt8 => "sint8",
            ForeignPrimitive::UInt16 => "uint16",
            ForeignPrimitive::SInt16 => "sint16",
            ForeignPrimitive::UInt32 => "uint32",
            ForeignPrimitive::SInt32 => "sint32",
            ForeignPrimitive::UInt64 => "uint64",
            ForeignPrimitive::SInt64 => "sint64",
            ForeignPrimitive::Float32 => "float",
            ForeignPrimitive::Float64 => "double",
            ForeignPrimitive::Pointer => "pointer",
        }
    }
}

impl fmt::Display for ForeignPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A C struct of primitives, with offsets computed by the C layout rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregateLayout {
    elements: Vec<ForeignPrimitive>,
    offsets: Vec<usize>,
    size: usize,
    align: usize,
}

impl AggregateLayout {
    fn new(elements: &[ForeignPrimitive]) -> Self {
        let mut offsets = Vec::with_capacity(elements.len());
        let mut offset = 0usize;
        let mut align = 1usize;
        for element in elements {
            let element_align = element.align();
            offset = offset.next_multiple_of(element_align);
            offsets.push(offset);
            offset += element.size();
            align = align.max(element_align);
        }
        AggregateLayout {
            elements: elements.to_vec(),
            offsets,
            size: offset.next_multiple_of(align),
            align,
        }
    }

    pub fn elements(&self) -> &[ForeignPrimitive] {
        &self.elements
    }

    /// Byte offset of each element.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Total size including trailing padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn align(&self) -> usize {
        self.align
    }
}

/// A native type slot: what a call interface sees for one value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// No value (a handler returning undefined).
    Void,
    Primitive(ForeignPrimitive),
    /// A struct, shared between the foreign type and every call layout
    /// that passes it by value.
    Aggregate(Arc<AggregateLayout>),
}

impl NativeType {
    /// Slot used for anything passed by reference.
    pub const POINTER: NativeType = NativeType::Primitive(ForeignPrimitive::Pointer);

    /// Build the layout for a foreign descriptor's primitive list.
    ///
    /// One element yields that primitive; more yield a struct.
    pub fn from_layout(layout: &[ForeignPrimitive]) -> RuntimeResult<Self> {
        match layout {
            [] => Err(RuntimeError::InvalidForeignDescriptor {
                reason: "layout is empty",
            }),
            [single] => Ok(NativeType::Primitive(*single)),
            elements => Ok(NativeType::Aggregate(Arc::new(AggregateLayout::new(
                elements,
            )))),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            NativeType::Void => 0,
            NativeType::Primitive(primitive) => primitive.size(),
            NativeType::Aggregate(aggregate) => aggregate.size(),
        }
    }

    pub fn align(&self) -> usize {
        match self {
            NativeType::Void => 1,
            NativeType::Primitive(primitive) => primitive.align(),
            NativeType::Aggregate(aggregate) => aggregate.align(),
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Void => f.write_str("void"),
            NativeType::Primitive(primitive) => f.write_str(primitive.name()),
            NativeType::Aggregate(aggregate) => {
                f.write_str("struct {")?;
                for (i, element) in aggregate.elements().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(element.name())?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A call interface for a handler type under one calling convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSignature {
    pub abi: Abi,
    pub ret: NativeType,
    /// Fixed arguments, in order. A variadic tail is not included.
    pub args: SmallVec<[NativeType; 4]>,
    /// Number of fixed arguments when the handler is variadic.
    pub fixed_args: Option<usize>,
}

impl CallSignature {
    pub fn is_variadic(&self) -> bool {
        self.fixed_args.is_some()
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.abi.name())?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        if self.is_variadic() {
            f.write_str(if self.args.is_empty() { "..." } else { ", ..." })?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

#[cfg(test)]
mod tests;
