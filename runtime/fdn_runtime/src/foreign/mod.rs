//! Foreign types: descriptors of native values and their marshalling.
//!
//! A [`ForeignDescriptor`] says how big a native value is, what machine
//! primitives it is made of, and which managed types it relates to. Its
//! [`ForeignCodec`] supplies the lifecycle and bridging callbacks.

mod builtin;
mod call;
mod layout;

use std::fmt;
use std::sync::Arc;

use fdn_ir::{hash_bytes, HashCode};

use crate::{RuntimeError, RuntimeResult, TypeId, Value};

pub use builtin::ForeignKind;
pub use layout::{AggregateLayout, CallSignature, ForeignPrimitive, NativeType};

/// Lifecycle and bridging callbacks for one foreign type.
///
/// Every method works on the raw native bytes of a value, sized exactly as
/// the descriptor says. Defaults treat contents as plain bytes with no
/// bridge.
pub trait ForeignCodec: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Put fresh storage into its default state.
    fn initialize(&self, contents: &mut [u8]) -> RuntimeResult<()> {
        contents.fill(0);
        Ok(())
    }

    /// Release anything the contents own. Runs once, when the value dies.
    fn finalize(&self, _contents: &mut [u8]) {}

    /// Whether the contents hold a meaningful value.
    fn defined(&self, _contents: &[u8]) -> bool {
        true
    }

    /// Move `from` into uninitialized `to`. `from` must not be finalized
    /// afterwards.
    fn move_contents(&self, from: &mut [u8], to: &mut [u8]) -> RuntimeResult<()> {
        to.copy_from_slice(from);
        Ok(())
    }

    /// Copy `from` into uninitialized `to`.
    fn copy_contents(&self, from: &[u8], to: &mut [u8]) -> RuntimeResult<()> {
        to.copy_from_slice(from);
        Ok(())
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }

    fn hash(&self, contents: &[u8]) -> HashCode {
        hash_bytes(contents)
    }

    /// Convert native contents into a value of the bridge type.
    fn import(&self, _contents: &[u8]) -> RuntimeResult<Value> {
        Err(RuntimeError::NotBridgeable { name: self.name() })
    }

    /// Convert a value of the bridge type into native contents.
    fn export(&self, _value: &Value, _contents: &mut [u8]) -> RuntimeResult<()> {
        Err(RuntimeError::NotBridgeable { name: self.name() })
    }

    fn describe(&self, contents: &[u8]) -> String {
        format!("<foreign {} ({} bytes)>", self.name(), contents.len())
    }
}

/// Everything needed to create a foreign type.
#[derive(Clone)]
pub struct ForeignDescriptor {
    /// Native size in bytes. Must be non-zero.
    pub size: usize,
    /// Machine primitives, in memory order.
    pub layout: Vec<ForeignPrimitive>,
    /// Supertype, for coercion between related foreign types.
    pub base: Option<TypeId>,
    /// Managed type values round-trip through.
    pub bridge: Option<TypeId>,
    pub codec: Arc<dyn ForeignCodec>,
}

impl ForeignDescriptor {
    /// A descriptor for a single primitive with the given codec.
    pub fn primitive(primitive: ForeignPrimitive, codec: Arc<dyn ForeignCodec>) -> Self {
        ForeignDescriptor {
            size: primitive.size(),
            layout: vec![primitive],
            base: None,
            bridge: None,
            codec,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_bridge(mut self, bridge: TypeId) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Check the size against the computed native layout.
    pub(crate) fn validate(&self) -> RuntimeResult<NativeType> {
        if self.size == 0 {
            return Err(RuntimeError::InvalidForeignDescriptor {
                reason: "size is zero",
            });
        }
        let native = NativeType::from_layout(&self.layout)?;
        if native.size() != self.size {
            return Err(RuntimeError::InvalidForeignDescriptor {
                reason: "size does not match the native layout",
            });
        }
        Ok(native)
    }
}

impl fmt::Debug for ForeignDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignDescriptor")
            .field("size", &self.size)
            .field("layout", &self.layout)
            .field("base", &self.base)
            .field("bridge", &self.bridge)
            .field("codec", &self.codec.name())
            .finish()
    }
}

/// A registered foreign type: its descriptor plus the layout computed
/// when it was created.
#[derive(Clone, Debug)]
pub struct ForeignInfo {
    pub descriptor: ForeignDescriptor,
    pub native: NativeType,
}
