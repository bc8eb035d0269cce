//! Foreign values: native bytes owned by the runtime.
//!
//! The buffer is sized by the type's descriptor and managed entirely
//! through its codec. Finalize runs when the last reference is dropped.

use std::fmt;
use std::sync::Arc;

use fdn_ir::{HashCode, HashStream};

use crate::foreign::{ForeignCodec, ForeignInfo};
use crate::{RuntimeError, RuntimeResult, TypeId, TypeRegistry, Value};

fn foreign_info(registry: &TypeRegistry, ty: TypeId) -> RuntimeResult<&ForeignInfo> {
    let concrete = registry.resolve_concrete(ty)?;
    registry
        .as_foreign(concrete)
        .ok_or(RuntimeError::NotForeign { ty })
}

fn alloc_contents(size: usize) -> RuntimeResult<Vec<u8>> {
    let mut contents = Vec::new();
    contents
        .try_reserve_exact(size)
        .map_err(|_| RuntimeError::OutOfMemory)?;
    contents.resize(size, 0);
    Ok(contents)
}

fn check_size(info: &ForeignInfo, len: usize) -> RuntimeResult<()> {
    if len == info.descriptor.size {
        Ok(())
    } else {
        Err(RuntimeError::InvalidForeignDescriptor {
            reason: "contents size does not match the descriptor",
        })
    }
}

/// A native value of some foreign type.
pub struct ForeignValue {
    type_id: TypeId,
    codec: Arc<dyn ForeignCodec>,
    contents: Box<[u8]>,
}

impl ForeignValue {
    fn build(
        registry: &TypeRegistry,
        ty: TypeId,
        fill: impl FnOnce(&ForeignInfo, &mut [u8]) -> RuntimeResult<()>,
    ) -> RuntimeResult<Value> {
        let info = foreign_info(registry, ty)?;
        let mut contents = alloc_contents(info.descriptor.size)?;
        fill(info, &mut contents)?;
        Ok(Value::foreign(ForeignValue {
            type_id: ty,
            codec: Arc::clone(&info.descriptor.codec),
            contents: contents.into_boxed_slice(),
        }))
    }

    /// A value copied from native bytes.
    pub fn create(registry: &TypeRegistry, ty: TypeId, contents: &[u8]) -> RuntimeResult<Value> {
        Self::build(registry, ty, |info, buffer| {
            check_size(info, contents.len())?;
            info.descriptor.codec.copy_contents(contents, buffer)
        })
    }

    /// A value taking over native bytes. The source must not be finalized
    /// by the caller afterwards.
    pub fn create_by_move(
        registry: &TypeRegistry,
        ty: TypeId,
        contents: &mut [u8],
    ) -> RuntimeResult<Value> {
        Self::build(registry, ty, |info, buffer| {
            check_size(info, contents.len())?;
            info.descriptor.codec.move_contents(contents, buffer)
        })
    }

    /// A value in the codec's default state.
    pub fn create_initialized(registry: &TypeRegistry, ty: TypeId) -> RuntimeResult<Value> {
        Self::build(registry, ty, |info, buffer| {
            info.descriptor.codec.initialize(buffer)
        })
    }

    /// Convert a bridge-typed value into a foreign value of type `ty`.
    pub fn export(registry: &TypeRegistry, ty: TypeId, value: &Value) -> RuntimeResult<Value> {
        let exported = Self::build(registry, ty, |info, buffer| {
            info.descriptor.codec.export(value, buffer)
        })?;
        tracing::trace!(?ty, "exported foreign value");
        Ok(exported)
    }

    /// Convert back into a value of the bridge type.
    pub fn import(&self) -> RuntimeResult<Value> {
        self.codec.import(&self.contents)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Raw native bytes.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn is_defined(&self) -> bool {
        self.codec.defined(&self.contents)
    }

    pub fn describe(&self) -> String {
        self.codec.describe(&self.contents)
    }

    /// Duplicate through the codec's copy callback.
    pub fn copy(&self) -> RuntimeResult<Value> {
        let mut contents = alloc_contents(self.contents.len())?;
        self.codec.copy_contents(&self.contents, &mut contents)?;
        Ok(Value::foreign(ForeignValue {
            type_id: self.type_id,
            codec: Arc::clone(&self.codec),
            contents: contents.into_boxed_slice(),
        }))
    }

    pub fn equals(&self, other: &ForeignValue) -> bool {
        self.type_id == other.type_id && self.codec.equal(&self.contents, &other.contents)
    }

    pub fn hash_code(&self) -> HashCode {
        HashStream::new()
            .integer(i64::from(self.type_id.raw()))
            .hash(self.codec.hash(&self.contents))
            .finish()
    }
}

impl Drop for ForeignValue {
    fn drop(&mut self) {
        self.codec.finalize(&mut self.contents);
    }
}

impl fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignValue")
            .field("type_id", &self.type_id)
            .field("contents", &self.describe())
            .finish()
    }
}
