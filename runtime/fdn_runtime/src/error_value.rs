//! Error values: an error type instantiated with a formatted message.

use fdn_ir::{hash_bytes, HashCode, HashStream};

use crate::{ArrayValue, Mismatch, RuntimeResult, TypeId, TypeRegistry, Value};

/// An instance of an error type.
#[derive(Clone, Debug)]
pub struct ErrorValue {
    type_id: TypeId,
    message: String,
    info: Option<ArrayValue>,
}

impl ErrorValue {
    /// Instantiate `error_type`, substituting each `%{key}` in its message
    /// template with the value of `key` in `info` (looked up ignoring
    /// case). Placeholders with no matching key are left as written.
    pub fn create(
        registry: &TypeRegistry,
        error_type: TypeId,
        info: Option<&ArrayValue>,
    ) -> RuntimeResult<Value> {
        let concrete = registry.resolve_concrete(error_type)?;
        let Some(template) = registry.error_message(concrete) else {
            return Err(Mismatch::WrongTypeKind { expected: "error" }.into());
        };
        Ok(Value::error(ErrorValue {
            type_id: error_type,
            message: format_message(template, info),
            info: info.cloned(),
        }))
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn info(&self) -> Option<&ArrayValue> {
        self.info.as_ref()
    }

    pub fn equals(&self, other: &ErrorValue) -> bool {
        self.type_id == other.type_id && self.message == other.message
    }

    pub fn hash_code(&self) -> HashCode {
        HashStream::new()
            .integer(i64::from(self.type_id.raw()))
            .hash(hash_bytes(self.message.as_bytes()))
            .finish()
    }
}

fn format_message(template: &str, info: Option<&ArrayValue>) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        message.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            rest = &rest[start..];
            break;
        };
        let key = &after[..end];
        match info.and_then(|info| info.get(key)) {
            Some(value) => message.push_str(&value.to_string()),
            None => message.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    message.push_str(rest);
    message
}
