//! Dispatch registry
//!
//! Maps interception targets to hooks:
//! - Free functions: one case-insensitive [`SymbolTable`]
//! - Methods: a [`ClassRegistry`] of per-class symbol tables, resolved
//!   through the class hierarchy (nearest ancestor wins)
//!
//! # Architecture
//!
//! ```text
//! HookRegistry (RwLock)
//! ├── functions: SymbolTable      "curl_exec" → DispatchEntry
//! └── classes:   ClassRegistry
//!                ├── "pdo"          → SymbolTable  "exec" → DispatchEntry
//!                └── "pdostatement" → SymbolTable  "execute" → DispatchEntry
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use tracehook_core::dispatch::{HookRegistry, HookOptions};
//! use tracehook_sdk::{Callable, ClassEntry};
//!
//! let registry = HookRegistry::initialized();
//! registry.trace(Some("PDO"), "exec", Some(&Callable::symbol("trace_pdo_exec")), HookOptions::PREHOOK);
//!
//! let pdo = ClassEntry::root("pdo");
//! if let Some(hook) = registry.find_dispatch(Some(&pdo), "EXEC") {
//!     // redirect the call through hook.callable()
//! }
//! ```

mod class_registry;
mod entry;
mod error;
mod global;
mod options;
mod registry;
mod table;

pub use class_registry::ClassRegistry;
pub use entry::{fold_name, DispatchEntry, DispatchHandle};
pub use error::RegistryError;
pub use global::{
    dispatch_destroy, dispatch_init, dispatch_reset, find_dispatch, global, hook_callable, trace,
};
pub use options::HookOptions;
pub use registry::{HookRegistry, RegistryStats, MAX_HIERARCHY_DEPTH};
pub use table::SymbolTable;
