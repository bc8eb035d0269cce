//! Builtin foreign types and their codecs.
//!
//! Numeric kinds bridge to `builtin.Number`, `Bool` to `builtin.Boolean`;
//! `Pointer` has no bridge. Conversions never truncate: anything out of
//! range, fractional, or beyond the contiguous-integer range of a double
//! is a `NumericOverflow`.

use std::sync::Arc;

use super::{ForeignCodec, ForeignPrimitive};
use crate::{BuiltinCode, Mismatch, Number, RuntimeError, RuntimeResult, TypeId, Value};

/// 2^53: doubles represent every integer up to this magnitude.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

const SHORT_CONTENTS: RuntimeError = RuntimeError::InvalidForeignDescriptor {
    reason: "contents shorter than layout",
};

/// The builtin foreign types every registry pre-registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ForeignKind {
    Bool,
    UInt8,
    SInt8,
    UInt16,
    SInt16,
    UInt32,
    SInt32,
    UInt64,
    SInt64,
    UIntSize,
    SIntSize,
    Float32,
    Float64,
    Pointer,
}

impl ForeignKind {
    pub const ALL: [ForeignKind; 14] = [
        ForeignKind::Bool,
        ForeignKind::UInt8,
        ForeignKind::SInt8,
        ForeignKind::UInt16,
        ForeignKind::SInt16,
        ForeignKind::UInt32,
        ForeignKind::SInt32,
        ForeignKind::UInt64,
        ForeignKind::SInt64,
        ForeignKind::UIntSize,
        ForeignKind::SIntSize,
        ForeignKind::Float32,
        ForeignKind::Float64,
        ForeignKind::Pointer,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ForeignKind::Bool => "Bool",
            ForeignKind::UInt8 => "UInt8",
            ForeignKind::SInt8 => "SInt8",
            ForeignKind::UInt16 => "UInt16",
            ForeignKind::SInt16 => "SInt16",
            ForeignKind::UInt32 => "UInt32",
            ForeignKind::SInt32 => "SInt32",
            ForeignKind::UInt64 => "UInt64",
            ForeignKind::SInt64 => "SInt64",
            ForeignKind::UIntSize => "UIntSize",
            ForeignKind::SIntSize => "SIntSize",
            ForeignKind::Float32 => "Float32",
            ForeignKind::Float64 => "Float64",
            ForeignKind::Pointer => "Pointer",
        }
    }

    /// Name of the registered Named type.
    pub const fn qualified_name(self) -> &'static str {
        match self {
            ForeignKind::Bool => "builtin.Bool",
            ForeignKind::UInt8 => "builtin.UInt8",
            ForeignKind::SInt8 => "builtin.SInt8",
            ForeignKind::UInt16 => "builtin.UInt16",
            ForeignKind::SInt16 => "builtin.SInt16",
            ForeignKind::UInt32 => "builtin.UInt32",
            ForeignKind::SInt32 => "builtin.SInt32",
            ForeignKind::UInt64 => "builtin.UInt64",
            ForeignKind::SInt64 => "builtin.SInt64",
            ForeignKind::UIntSize => "builtin.UIntSize",
            ForeignKind::SIntSize => "builtin.SIntSize",
            ForeignKind::Float32 => "builtin.Float32",
            ForeignKind::Float64 => "builtin.Float64",
            ForeignKind::Pointer => "builtin.Pointer",
        }
    }

    pub const fn primitive(self) -> ForeignPrimitive {
        match self {
            ForeignKind::Bool => ForeignPrimitive::Bool,
            ForeignKind::UInt8 => ForeignPrimitive::UInt8,
            ForeignKind::SInt8 => ForeignPrimitive::SInt8,
            ForeignKind::UInt16 => ForeignPrimitive::UInt16,
            ForeignKind::SInt16 => ForeignPrimitive::SInt16,
            ForeignKind::UInt32 => ForeignPrimitive::UInt32,
            ForeignKind::SInt32 => ForeignPrimitive::SInt32,
            ForeignKind::UInt64 => ForeignPrimitive::UInt64,
            ForeignKind::SInt64 => ForeignPrimitive::SInt64,
            ForeignKind::UIntSize => ForeignPrimitive::USIZE,
            ForeignKind::SIntSize => ForeignPrimitive::ISIZE,
            ForeignKind::Float32 => ForeignPrimitive::Float32,
            ForeignKind::Float64 => ForeignPrimitive::Float64,
            ForeignKind::Pointer => ForeignPrimitive::Pointer,
        }
    }

    /// The managed type values of this kind round-trip through.
    pub const fn bridge(self) -> Option<TypeId> {
        match self {
            ForeignKind::Bool => Some(TypeId::BOOLEAN),
            ForeignKind::Pointer => None,
            _ => Some(TypeId::NUMBER),
        }
    }

    pub fn codec(self) -> Arc<dyn ForeignCodec> {
        match self {
            ForeignKind::Bool => Arc::new(BoolCodec),
            ForeignKind::Float32 | ForeignKind::Float64 => Arc::new(FloatCodec { kind: self }),
            ForeignKind::Pointer => Arc::new(PointerCodec),
            _ => Arc::new(IntegerCodec { kind: self }),
        }
    }
}

fn read_array<const N: usize>(contents: &[u8]) -> RuntimeResult<[u8; N]> {
    contents
        .get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(SHORT_CONTENTS)
}

fn write_bytes(contents: &mut [u8], bytes: &[u8]) -> RuntimeResult<()> {
    contents
        .get_mut(..bytes.len())
        .ok_or(SHORT_CONTENTS)?
        .copy_from_slice(bytes);
    Ok(())
}

fn expect_number(value: &Value) -> RuntimeResult<Number> {
    match value {
        Value::Number(number) => Ok(*number),
        other => Err(Mismatch::WrongValueKind {
            expected: "number",
            found: other.kind().name(),
        }
        .into()),
    }
}

struct BoolCodec;

impl ForeignCodec for BoolCodec {
    fn name(&self) -> &'static str {
        ForeignKind::Bool.name()
    }

    fn import(&self, contents: &[u8]) -> RuntimeResult<Value> {
        let [byte] = read_array::<1>(contents)?;
        Ok(Value::boolean(byte != 0))
    }

    fn export(&self, value: &Value, contents: &mut [u8]) -> RuntimeResult<()> {
        match value {
            Value::Boolean(b) => write_bytes(contents, &[u8::from(*b)]),
            other => Err(Mismatch::WrongValueKind {
                expected: "boolean",
                found: other.kind().name(),
            }
            .into()),
        }
    }

    fn describe(&self, contents: &[u8]) -> String {
        match read_array::<1>(contents) {
            Ok([byte]) => format!("<foreign Bool: {}>", byte != 0),
            Err(_) => "<foreign Bool>".to_owned(),
        }
    }
}

struct IntegerCodec {
    kind: ForeignKind,
}

impl IntegerCodec {
    fn overflow(&self) -> RuntimeError {
        RuntimeError::NumericOverflow {
            target: self.kind.name(),
        }
    }

    fn read(&self, contents: &[u8]) -> RuntimeResult<i128> {
        Ok(match self.kind.primitive() {
            ForeignPrimitive::UInt8 => i128::from(u8::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::SInt8 => i128::from(i8::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::UInt16 => i128::from(u16::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::SInt16 => i128::from(i16::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::UInt32 => i128::from(u32::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::SInt32 => i128::from(i32::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::UInt64 => i128::from(u64::from_ne_bytes(read_array(contents)?)),
            ForeignPrimitive::SInt64 => i128::from(i64::from_ne_bytes(read_array(contents)?)),
            _ => {
                return Err(RuntimeError::InvalidForeignDescriptor {
                    reason: "not an integer layout",
                })
            }
        })
    }

    fn write(&self, value: i128, contents: &mut [u8]) -> RuntimeResult<()> {
        let overflow = |_| self.overflow();
        match self.kind.primitive() {
            ForeignPrimitive::UInt8 => {
                write_bytes(contents, &u8::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::SInt8 => {
                write_bytes(contents, &i8::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::UInt16 => {
                write_bytes(contents, &u16::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::SInt16 => {
                write_bytes(contents, &i16::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::UInt32 => {
                write_bytes(contents, &u32::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::SInt32 => {
                write_bytes(contents, &i32::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::UInt64 => {
                write_bytes(contents, &u64::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            ForeignPrimitive::SInt64 => {
                write_bytes(contents, &i64::try_from(value).map_err(overflow)?.to_ne_bytes())
            }
            _ => Err(RuntimeError::InvalidForeignDescriptor {
                reason: "not an integer layout",
            }),
        }
    }

    /// The exact integer a number denotes, if it has one a double can
    /// represent precisely.
    fn integral(&self, number: Number) -> RuntimeResult<i128> {
        match number {
            Number::Integer(i) => Ok(i128::from(i)),
            Number::Real(r) => {
                if !r.is_finite() || r.abs() > MAX_SAFE_INTEGER || r.fract() != 0.0 {
                    return Err(self.overflow());
                }
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "integral and within 2^53"
                )]
                let integral = r as i128;
                Ok(integral)
            }
        }
    }
}

impl ForeignCodec for IntegerCodec {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn import(&self, contents: &[u8]) -> RuntimeResult<Value> {
        let value = self.read(contents)?;
        if let Ok(small) = i32::try_from(value) {
            return Ok(Value::integer(small));
        }
        if value.unsigned_abs() > 1 << 53 {
            return Err(RuntimeError::NumericOverflow {
                target: BuiltinCode::Number.qualified_name(),
            });
        }
        #[allow(clippy::cast_precision_loss, reason = "within 2^53, exact")]
        let real = value as f64;
        Ok(Value::real(real))
    }

    fn export(&self, value: &Value, contents: &mut [u8]) -> RuntimeResult<()> {
        let integral = self.integral(expect_number(value)?)?;
        self.write(integral, contents)
    }

    fn describe(&self, contents: &[u8]) -> String {
        match self.read(contents) {
            Ok(value) => format!("<foreign {}: {value}>", self.kind.name()),
            Err(_) => format!("<foreign {}>", self.kind.name()),
        }
    }
}

struct FloatCodec {
    kind: ForeignKind,
}

impl FloatCodec {
    fn read(&self, contents: &[u8]) -> RuntimeResult<f64> {
        if self.kind == ForeignKind::Float32 {
            Ok(f64::from(f32::from_ne_bytes(read_array(contents)?)))
        } else {
            Ok(f64::from_ne_bytes(read_array(contents)?))
        }
    }
}

impl ForeignCodec for FloatCodec {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn import(&self, contents: &[u8]) -> RuntimeResult<Value> {
        Ok(Value::real(self.read(contents)?))
    }

    fn export(&self, value: &Value, contents: &mut [u8]) -> RuntimeResult<()> {
        let real = expect_number(value)?.as_f64();
        if self.kind == ForeignKind::Float64 {
            return write_bytes(contents, &real.to_ne_bytes());
        }
        if real.is_finite() && real.abs() > f64::from(f32::MAX) {
            return Err(RuntimeError::NumericOverflow {
                target: self.kind.name(),
            });
        }
        #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
        let single = real as f32;
        write_bytes(contents, &single.to_ne_bytes())
    }

    fn describe(&self, contents: &[u8]) -> String {
        match self.read(contents) {
            Ok(value) => format!("<foreign {}: {value}>", self.kind.name()),
            Err(_) => format!("<foreign {}>", self.kind.name()),
        }
    }
}

struct PointerCodec;

impl ForeignCodec for PointerCodec {
    fn name(&self) -> &'static str {
        ForeignKind::Pointer.name()
    }

    /// Null pointers are undefined.
    fn defined(&self, contents: &[u8]) -> bool {
        contents.iter().any(|&byte| byte != 0)
    }

    fn describe(&self, contents: &[u8]) -> String {
        match read_array::<{ std::mem::size_of::<usize>() }>(contents) {
            Ok(bytes) => format!("<foreign Pointer: {:#x}>", usize::from_ne_bytes(bytes)),
            Err(_) => "<foreign Pointer>".to_owned(),
        }
    }
}
