//! Host class catalog
//!
//! Hosts that can describe their classes only by name (for example through
//! the C ABI) declare them here, parent first. The catalog turns a class
//! name back into a [`ClassEntry`] with its full parent chain so method
//! resolution can walk the hierarchy.
//!
//! Hosts with their own class metadata implement
//! [`ClassScope`](tracehook_sdk::ClassScope) instead and skip the catalog.

mod catalog;

pub use catalog::{
    class_count, clear_classes, declare_class, forget_class, get_class, is_declared,
    resolve_class, ClassError,
};
