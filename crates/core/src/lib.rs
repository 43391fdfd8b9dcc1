//! tracehook - Core Logic
//!
//! This crate contains the function-call interception registry: hooks are
//! registered against free functions or `(class, method)` pairs and
//! resolved at call time, honouring class inheritance and ignoring case.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - Host class model, callables and FFI types

use tracing::info;

pub use tracehook_sdk as sdk;

pub mod bootstrap;
pub mod classes;
pub mod config;
pub mod dispatch;

// Re-export commonly used items
pub use bootstrap::{register_hooks, BootstrapReport};
pub use classes::{declare_class, resolve_class, ClassError};
pub use config::{ConfigError, ConfigFormat, ConfigResult, HookSpec, TracerConfig};
pub use dispatch::{
    dispatch_destroy, dispatch_init, dispatch_reset, find_dispatch, hook_callable, trace,
    DispatchEntry, DispatchHandle, HookOptions, HookRegistry, RegistryError, RegistryStats,
};
pub use sdk::{Callable, ClassEntry, ClassScope};

/// Start the process-wide registry and register hooks from `config`
pub fn startup(config: &TracerConfig) -> BootstrapReport {
    info!("tracehook starting...");
    dispatch_init();
    register_hooks(dispatch::global(), config)
}

/// Tear down the process-wide registry and class catalog
pub fn shutdown() {
    info!("tracehook shutting down...");
    dispatch_destroy();
    classes::clear_classes();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_exist() {
        // Verify SDK types are accessible through the re-export
        use crate::sdk::{ClassEntry, ClassScope};
        let entry = ClassEntry::root("Probe");
        assert_eq!(entry.class_name(), "Probe");
    }
}
