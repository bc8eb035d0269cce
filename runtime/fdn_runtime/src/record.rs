//! Record values.
//!
//! A record holds one value per field of its record type, in declaration
//! order. Every stored value conforms to its field's type at the time it
//! is stored. Records built with [`RecordValue::create`] are immutable;
//! [`RecordValue::create_mutable`] and [`RecordValue::mutable_copy`] give
//! storage that [`RecordValue::store_value`] may update.

use fdn_ir::{HashCode, HashStream};

use crate::{
    ArrayValue, Mismatch, RecordInfo, RuntimeError, RuntimeResult, TypeId, TypeRegistry, Value,
};

fn record_info(registry: &TypeRegistry, ty: TypeId) -> RuntimeResult<&RecordInfo> {
    let concrete = registry.resolve_concrete(ty)?;
    registry.as_record(concrete).ok_or_else(|| {
        Mismatch::WrongTypeKind {
            expected: "record",
        }
        .into()
    })
}

fn alloc_fields(count: usize) -> RuntimeResult<Vec<Value>> {
    let mut fields = Vec::new();
    fields
        .try_reserve_exact(count)
        .map_err(|_| RuntimeError::OutOfMemory)?;
    Ok(fields)
}

/// An instance of a record type.
#[derive(Clone, Debug)]
pub struct RecordValue {
    type_id: TypeId,
    fields: Vec<Value>,
    mutable: bool,
}

impl RecordValue {
    /// An immutable record from one value per field, in field order.
    pub fn create(registry: &TypeRegistry, ty: TypeId, values: &[Value]) -> RuntimeResult<Self> {
        let info = record_info(registry, ty)?;
        if values.len() != info.fields.len() {
            return Err(Mismatch::FieldCountMismatch {
                expected: info.fields.len(),
                found: values.len(),
            }
            .into());
        }

        let mut fields = alloc_fields(values.len())?;
        for (field, value) in info.fields.iter().zip(values) {
            if !registry.value_conforms(value, field.ty)? {
                return Err(Mismatch::FieldTypeMismatch {
                    field: registry.name_str(field.name),
                }
                .into());
            }
            fields.push(value.clone());
        }

        Ok(RecordValue {
            type_id: ty,
            fields,
            mutable: false,
        })
    }

    /// A mutable record with every field undefined.
    ///
    /// Undefined does not conform to a non-optional field, so until each
    /// such field has been stored the record encodes to an array that
    /// [`RecordValue::decode_from_array`] rejects.
    pub fn create_mutable(registry: &TypeRegistry, ty: TypeId) -> RuntimeResult<Self> {
        let count = record_info(registry, ty)?.fields.len();
        let mut fields = alloc_fields(count)?;
        fields.resize(count, Value::Null);
        Ok(RecordValue {
            type_id: ty,
            fields,
            mutable: true,
        })
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Field values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    /// Position and declared type of a field, by caseless name.
    fn field_slot(&self, registry: &TypeRegistry, field: &str) -> RuntimeResult<(usize, TypeId)> {
        let info = record_info(registry, self.type_id)?;
        let names = registry.names();
        names
            .find_caseless(field)
            .and_then(|folded| {
                info.fields
                    .iter()
                    .position(|declared| names.fold(declared.name) == folded)
            })
            .map(|index| (index, info.fields[index].ty))
            .ok_or_else(|| {
                Mismatch::UnknownField {
                    field: field.to_owned(),
                }
                .into()
            })
    }

    /// The value of a field, looked up ignoring case.
    pub fn fetch_value(&self, registry: &TypeRegistry, field: &str) -> RuntimeResult<&Value> {
        let (index, _) = self.field_slot(registry, field)?;
        Ok(&self.fields[index])
    }

    /// Replace a field's value. The record must be mutable and the value
    /// must conform to the field's type.
    pub fn store_value(
        &mut self,
        registry: &TypeRegistry,
        field: &str,
        value: Value,
    ) -> RuntimeResult<()> {
        if !self.mutable {
            return Err(RuntimeError::Immutable);
        }
        let (index, ty) = self.field_slot(registry, field)?;
        if !registry.value_conforms(&value, ty)? {
            let info = record_info(registry, self.type_id)?;
            return Err(Mismatch::FieldTypeMismatch {
                field: registry.name_str(info.fields[index].name),
            }
            .into());
        }
        self.fields[index] = value;
        Ok(())
    }

    /// An immutable copy sharing the field values.
    #[must_use]
    pub fn copy(&self) -> RecordValue {
        RecordValue {
            type_id: self.type_id,
            fields: self.fields.clone(),
            mutable: false,
        }
    }

    /// A mutable copy with its own field storage.
    #[must_use]
    pub fn mutable_copy(&self) -> RecordValue {
        RecordValue {
            type_id: self.type_id,
            fields: self.fields.clone(),
            mutable: true,
        }
    }

    pub(crate) fn into_frozen(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// The record as an array keyed by field name.
    pub fn encode_as_array(&self, registry: &TypeRegistry) -> RuntimeResult<ArrayValue> {
        let info = record_info(registry, self.type_id)?;
        let mut array = ArrayValue::with_capacity(self.fields.len());
        for (field, value) in info.fields.iter().zip(&self.fields) {
            array.insert(registry.name_str(field.name), value.clone());
        }
        Ok(array)
    }

    /// An immutable record of type `ty` from an array whose keys are
    /// exactly the field names, ignoring case.
    pub fn decode_from_array(
        registry: &TypeRegistry,
        ty: TypeId,
        array: &ArrayValue,
    ) -> RuntimeResult<Self> {
        let info = record_info(registry, ty)?;
        if array.len() != info.fields.len() {
            return Err(Mismatch::KeyCountMismatch {
                expected: info.fields.len(),
                found: array.len(),
            }
            .into());
        }

        let mut values = alloc_fields(info.fields.len())?;
        for field in &info.fields {
            let spelling = registry.name_str(field.name);
            let value = array
                .get(spelling)
                .ok_or(Mismatch::MissingField { field: spelling })?;
            values.push(value.clone());
        }
        Self::create(registry, ty, &values)
    }

    pub fn equals(&self, other: &RecordValue) -> bool {
        self.type_id == other.type_id
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.equals(b))
    }

    pub fn hash_code(&self) -> HashCode {
        self.fields
            .iter()
            .fold(
                HashStream::new().integer(i64::from(self.type_id.raw())),
                |stream, value| stream.hash(value.hash_code()),
            )
            .finish()
    }
}
