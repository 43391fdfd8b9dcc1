//! tracehook Plugin - FFI Layer
//!
//! This crate provides the C ABI an embedding host (an interpreter
//! extension, a language runtime) links against. It compiles to a cdylib
//! (.so/.dll) and generates `include/tracehook.h`.

pub mod ffi;

pub use tracehook_core::shutdown;
