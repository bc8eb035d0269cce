//! Type descriptions for diagnostics and debugging.

use std::fmt::Write;

use crate::{Binding, TypeId, TypeInfo, TypeRegistry};

impl TypeRegistry {
    /// Render a type as a human-readable string.
    ///
    /// Named types print as their name without following the binding, so
    /// recursive type graphs terminate.
    pub fn describe(&self, id: TypeId) -> String {
        let mut buf = String::new();
        self.describe_into(id, &mut buf);
        buf
    }

    /// Render a type into an existing buffer.
    pub fn describe_into(&self, id: TypeId, buf: &mut String) {
        match self.get(id) {
            TypeInfo::Builtin(code) => buf.push_str(code.name()),
            TypeInfo::Named { name, binding } => {
                buf.push_str(self.name_str(*name));
                if *binding == Binding::Unbound {
                    buf.push_str(" (unbound)");
                }
            }
            TypeInfo::Alias { name, target } => {
                let _ = write!(buf, "alias {} = ", self.name_str(*name));
                self.describe_into(*target, buf);
            }
            TypeInfo::Optional { base } => {
                buf.push_str("optional(");
                self.describe_into(*base, buf);
                buf.push(')');
            }
            TypeInfo::Foreign(foreign) => {
                let _ = write!(
                    buf,
                    "foreign {} [{}]",
                    foreign.descriptor.codec.name(),
                    foreign.native
                );
            }
            TypeInfo::Record(record) => {
                buf.push_str("record { ");
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    let _ = write!(buf, "{}: ", self.name_str(field.name));
                    self.describe_into(field.ty, buf);
                }
                buf.push_str(" }");
            }
            TypeInfo::Handler(handler) => {
                if handler.is_foreign() {
                    buf.push_str("foreign ");
                }
                buf.push_str("handler(");
                for (i, param) in handler.params.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push_str(param.mode.name());
                    buf.push(' ');
                    self.describe_into(param.ty, buf);
                }
                buf.push_str(") -> ");
                self.describe_into(handler.ret, buf);
            }
            TypeInfo::Error { domain, message } => {
                let _ = write!(buf, "error {}: {message:?}", self.name_str(*domain));
            }
            TypeInfo::Custom(custom) => {
                let _ = write!(buf, "custom#{} : ", id.raw());
                self.describe_into(custom.base, buf);
            }
        }
    }
}
