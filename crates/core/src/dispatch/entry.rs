//! Dispatch entries and symbol name folding

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracehook_sdk::Callable;

use super::options::HookOptions;

/// Shared handle to a stored entry
///
/// Cloning a handle is the "copy" of an entry; dropping it is the "release".
/// A handle obtained from a lookup stays valid after the registry
/// overwrites, clears or destroys the table it came from.
pub type DispatchHandle = Arc<DispatchEntry>;

/// Fold a symbol name to its lookup key (ASCII lowercase)
///
/// Borrows when `name` has no uppercase ASCII bytes.
pub fn fold_name(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// A single hook registration
#[derive(Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// Case-folded function or method name
    function_name: String,
    /// Hook target; `None` for observation-only hooks
    callable: Option<Callable>,
    /// Option bits, passed through untouched
    options: HookOptions,
}

impl DispatchEntry {
    /// Build an entry, folding `function_name`
    pub fn new(function_name: &str, callable: Option<Callable>, options: HookOptions) -> Self {
        Self {
            function_name: fold_name(function_name).into_owned(),
            callable,
            options,
        }
    }

    /// Folded function name (the table key)
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Hook target, if any
    pub fn callable(&self) -> Option<&Callable> {
        self.callable.as_ref()
    }

    pub fn options(&self) -> HookOptions {
        self.options
    }

    /// Whether this hook only observes (no callable to redirect to)
    pub fn is_observer(&self) -> bool {
        self.callable.is_none()
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("function_name", &self.function_name)
            .field("callable", &self.callable)
            .field("options", &format_args!("{:#x}", self.options.bits()))
            .finish()
    }
}
