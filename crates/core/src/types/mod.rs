//! Newtype wrappers for type-safe entity references.

pub mod id;

pub use id::*;
