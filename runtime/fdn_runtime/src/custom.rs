//! Custom types: opaque managed payloads with a small callback table.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use fdn_ir::{HashCode, HashStream};

use crate::{Mismatch, RuntimeResult, TypeId, TypeRegistry, Value};

/// Payload carried by a custom value.
pub type CustomPayload = dyn Any + Send + Sync;

/// Behavior shared by every value of one custom type.
///
/// The defaults give identity semantics: no two distinct values are
/// equal, and copies share the payload.
pub trait CustomCallbacks: Send + Sync {
    fn equal(&self, _a: &CustomPayload, _b: &CustomPayload) -> bool {
        false
    }

    fn hash(&self, _payload: &CustomPayload) -> HashCode {
        0
    }

    /// A new payload for a copy, or `None` to share the existing one.
    fn copy(&self, _payload: &CustomPayload) -> RuntimeResult<Option<Box<CustomPayload>>> {
        Ok(None)
    }

    fn describe(&self, _payload: &CustomPayload) -> String {
        "<custom>".to_owned()
    }
}

/// An instance of a custom type.
pub struct CustomValue {
    type_id: TypeId,
    callbacks: Arc<dyn CustomCallbacks>,
    payload: Arc<CustomPayload>,
}

impl CustomValue {
    /// Wrap `payload` as a value of custom type `ty`.
    pub fn create<T: Any + Send + Sync>(
        registry: &TypeRegistry,
        ty: TypeId,
        payload: T,
    ) -> RuntimeResult<Value> {
        let concrete = registry.resolve_concrete(ty)?;
        let Some(custom) = registry.as_custom(concrete) else {
            return Err(Mismatch::WrongTypeKind { expected: "custom" }.into());
        };
        Ok(Value::custom(CustomValue {
            type_id: ty,
            callbacks: Arc::clone(&custom.callbacks),
            payload: Arc::new(payload),
        }))
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The payload, if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        let payload: &dyn Any = &*self.payload;
        payload.downcast_ref()
    }

    /// Duplicate through the type's copy callback.
    pub fn copy(&self) -> RuntimeResult<Value> {
        let payload = match self.callbacks.copy(&*self.payload)? {
            Some(fresh) => Arc::from(fresh),
            None => Arc::clone(&self.payload),
        };
        Ok(Value::custom(CustomValue {
            type_id: self.type_id,
            callbacks: Arc::clone(&self.callbacks),
            payload,
        }))
    }

    pub fn describe(&self) -> String {
        self.callbacks.describe(&*self.payload)
    }

    pub fn equals(&self, other: &CustomValue) -> bool {
        self.type_id == other.type_id
            && (Arc::ptr_eq(&self.payload, &other.payload)
                || self.callbacks.equal(&*self.payload, &*other.payload))
    }

    pub fn hash_code(&self) -> HashCode {
        HashStream::new()
            .integer(i64::from(self.type_id.raw()))
            .hash(self.callbacks.hash(&*self.payload))
            .finish()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_id", &self.type_id)
            .field("payload", &self.describe())
            .finish()
    }
}
