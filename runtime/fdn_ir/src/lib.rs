//! Foundation IR - identifiers and hashing.
//!
//! The leaf crate of the foundation runtime:
//! - `Name` / `NameTable` for interned, caselessly comparable identifiers
//! - Hashing primitives used to derive identity from structural content

pub mod hash;
mod name;
mod names;

pub use hash::{
    combine_unordered, hash_bytes, hash_bytes_stream, hash_double, hash_integer, HashCode,
    HashStream,
};
pub use name::Name;
pub use names::NameTable;
