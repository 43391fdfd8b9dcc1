//! Process-wide dispatch registry
//!
//! The embedding host drives the lifecycle: [`dispatch_init`] at startup,
//! [`dispatch_reset`] between units of work, [`dispatch_destroy`] at
//! shutdown. Lifecycle calls must not race registration or resolution.

use std::sync::LazyLock;

use tracehook_sdk::{Callable, ClassScope};

use super::entry::DispatchHandle;
use super::options::HookOptions;
use super::registry::HookRegistry;

/// Global dispatch registry (uninitialized until [`dispatch_init`])
static DISPATCH: LazyLock<HookRegistry> = LazyLock::new(HookRegistry::new);

/// The process-wide registry
pub fn global() -> &'static HookRegistry {
    &DISPATCH
}

/// Allocate the global roots (idempotent)
pub fn dispatch_init() {
    DISPATCH.init();
}

/// Release the global roots
pub fn dispatch_destroy() {
    DISPATCH.destroy();
}

/// Empty the global roots, keeping them allocated
pub fn dispatch_reset() {
    DISPATCH.reset();
}

/// Register a hook on the global registry
///
/// See [`HookRegistry::trace`].
pub fn trace(
    class: Option<&str>,
    function: &str,
    callable: Option<&Callable>,
    options: HookOptions,
) -> bool {
    DISPATCH.trace(class, function, callable, options)
}

/// Register a hook on the global registry from raw buffers
///
/// See [`HookRegistry::hook_callable`].
pub fn hook_callable(
    class: Option<&[u8]>,
    function: &[u8],
    callable: Option<&[u8]>,
    options: u32,
) -> bool {
    DISPATCH.hook_callable(class, function, callable, options)
}

/// Resolve a hook on the global registry
pub fn find_dispatch(scope: Option<&dyn ClassScope>, function: &str) -> Option<DispatchHandle> {
    DISPATCH.find_dispatch(scope, function)
}
