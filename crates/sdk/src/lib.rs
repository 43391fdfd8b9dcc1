//! tracehook SDK - Host-Facing Type Definitions
//!
//! This crate contains the types an embedding host shares with the
//! interception registry. It has no dependencies and compiles quickly,
//! allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`class`] - Minimal class model (name + single parent) used for method resolution
//! - [`callable`] - Opaque hook target values
//! - [`ffi`] - `#[repr(C)]` types shared with the C ABI

pub mod callable;
pub mod class;
pub mod ffi;

pub use callable::Callable;
pub use class::{ClassEntry, ClassScope};
pub use ffi::{TracehookStr, ABI_VERSION, NO_DISPATCH};
