//! Host class model
//!
//! The registry only needs two facts about a class: its name and its
//! parent. Hosts with their own class metadata implement [`ClassScope`]
//! directly; [`ClassEntry`] is a reference implementation for hosts that
//! only know class names.

use std::fmt;
use std::sync::Arc;

/// A class context for method resolution.
///
/// Implementations must describe a finite, acyclic parent chain. The
/// registry walks `parent()` until it returns `None`.
pub trait ClassScope {
    /// Class name as known to the host (any case)
    fn class_name(&self) -> &str;

    /// Direct parent class, if any
    fn parent(&self) -> Option<&dyn ClassScope>;
}

/// Immutable class node with a shared parent link
///
/// Because a parent must exist before its child is built, a chain of
/// `ClassEntry` values can never form a cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct ClassEntry {
    name: String,
    parent: Option<Arc<ClassEntry>>,
}

impl ClassEntry {
    /// Create a class without a parent
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Create a class extending `parent`
    pub fn extending(name: impl Into<String>, parent: Arc<ClassEntry>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
        }
    }

    /// Class name as declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent entry, if any
    pub fn parent_entry(&self) -> Option<&Arc<ClassEntry>> {
        self.parent.as_ref()
    }

    /// Number of ancestors above this class
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            depth += 1;
            current = class.parent.as_deref();
        }
        depth
    }
}

impl ClassScope for ClassEntry {
    fn class_name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<&dyn ClassScope> {
        self.parent.as_deref().map(|p| p as &dyn ClassScope)
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chain = f.debug_list();
        chain.entry(&self.name);
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            chain.entry(&class.name);
            current = class.parent.as_deref();
        }
        chain.finish()
    }
}
