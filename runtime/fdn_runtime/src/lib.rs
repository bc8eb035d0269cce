//! Foundation type-and-value runtime.
//!
//! - [`TypeRegistry`]: interned type descriptors (builtin, alias, named,
//!   optional, foreign, record, handler, error, custom) in one arena
//! - Resolution ([`TypeRegistry::resolve`]) and conformance
//!   ([`TypeRegistry::type_conforms`])
//! - The foreign bridge: native layouts, call layouts and codecs that
//!   move numbers, booleans and pointers across the native boundary
//! - The value kernel ([`Value`]) with records, foreign, custom and
//!   error values, and slot conversion ([`convert`])
//!
//! The runtime is single-owner; share a registry across threads through
//! [`SharedTypeRegistry`].

mod builtin;
mod config;
mod conform;
mod convert;
mod custom;
mod data;
mod error;
mod error_value;
pub mod foreign;
mod foreign_value;
mod idx;
mod record;
mod registry;
mod resolve;
mod stack;
mod value;

use std::sync::Once;

pub use builtin::BuiltinCode;
pub use config::{Abi, RegistryConfig};
pub use convert::{bridge, convert};
pub use custom::{CustomCallbacks, CustomPayload, CustomValue};
pub use data::{
    Binding, CustomInfo, HandlerFlags, HandlerInfo, HandlerParam, ParamMode, RecordField,
    RecordInfo, TypeInfo,
};
pub use error::{Mismatch, RuntimeError, RuntimeResult};
pub use error_value::ErrorValue;
pub use foreign::{
    CallSignature, ForeignCodec, ForeignDescriptor, ForeignInfo, ForeignKind, ForeignPrimitive,
    NativeType,
};
pub use foreign_value::ForeignValue;
pub use idx::TypeId;
pub use record::RecordValue;
pub use registry::{SharedTypeRegistry, TypeRegistry};
pub use resolve::ResolvedType;
pub use value::{ArrayValue, Heap, Number, Value, ValueKind, ValueTable};

pub use fdn_ir::{Name, NameTable};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect. If the host already installed a global subscriber, that one is
/// kept and told about the conflict.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            if let Err(error) = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
            {
                tracing::warn!(%error, "keeping the existing tracing subscriber");
            }
        }
    });
}
