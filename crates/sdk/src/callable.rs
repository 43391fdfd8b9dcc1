//! Opaque hook targets
//!
//! The registry never executes a callable. It only stores one reference per
//! registration and hands out copies on lookup.

use std::fmt;
use std::sync::Arc;

/// A hook target as supplied by the host
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Callable {
    /// Named host function (e.g. a userland function name)
    Symbol(Arc<str>),

    /// Host-owned value identified by an opaque id (closures, objects)
    Handle(u64),
}

impl Callable {
    /// Create a named callable
    pub fn symbol(name: &str) -> Self {
        Callable::Symbol(Arc::from(name))
    }

    /// Symbol name, if this callable is named
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Callable::Symbol(name) => Some(&**name),
            Callable::Handle(_) => None,
        }
    }
}

impl From<&str> for Callable {
    fn from(name: &str) -> Self {
        Callable::symbol(name)
    }
}

impl From<String> for Callable {
    fn from(name: String) -> Self {
        Callable::Symbol(Arc::from(name))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Symbol(name) => write!(f, "Symbol({name})"),
            Callable::Handle(id) => write!(f, "Handle({id:#x})"),
        }
    }
}
