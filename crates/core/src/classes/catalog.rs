//! Class catalog - declared classes keyed by folded name

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use tracehook_sdk::ClassEntry;

use crate::dispatch::fold_name;

/// Error type for class declarations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassError {
    #[error("Class name is empty")]
    EmptyName,

    #[error("Parent class not declared: {0}")]
    UnknownParent(String),
}

/// Global class catalog keyed by folded class name
static CLASSES: LazyLock<DashMap<String, Arc<ClassEntry>>> = LazyLock::new(DashMap::new);

/// Declare a class and its parent
///
/// The parent must already be declared, so the catalog can only ever hold
/// acyclic hierarchies. Redeclaring a class replaces it; classes declared
/// earlier keep the parent chain they were built with.
///
/// # Example
/// ```ignore
/// declare_class("PDOStatement", None)?;
/// declare_class("MyStatement", Some("PDOStatement"))?;
/// ```
pub fn declare_class(name: &str, parent: Option<&str>) -> Result<Arc<ClassEntry>, ClassError> {
    if name.is_empty() {
        return Err(ClassError::EmptyName);
    }

    let entry = match parent {
        Some(parent_name) => {
            let parent_entry =
                get_class(parent_name).ok_or_else(|| ClassError::UnknownParent(parent_name.to_string()))?;
            ClassEntry::extending(name, parent_entry)
        }
        None => ClassEntry::root(name),
    };

    let entry = Arc::new(entry);
    CLASSES.insert(fold_name(name).into_owned(), entry.clone());
    tracing::trace!("Declared class {:?}", entry);
    Ok(entry)
}

/// Look up a declared class (any case)
pub fn get_class(name: &str) -> Option<Arc<ClassEntry>> {
    CLASSES
        .get(fold_name(name).as_ref())
        .map(|entry| entry.value().clone())
}

/// Declared class, or a parentless stand-in for an undeclared one
pub fn resolve_class(name: &str) -> Arc<ClassEntry> {
    get_class(name).unwrap_or_else(|| Arc::new(ClassEntry::root(name)))
}

/// Check if a class has been declared
pub fn is_declared(name: &str) -> bool {
    CLASSES.contains_key(fold_name(name).as_ref())
}

/// Remove a class declaration
///
/// Returns `true` if the class was declared.
pub fn forget_class(name: &str) -> bool {
    CLASSES.remove(fold_name(name).as_ref()).is_some()
}

/// Number of declared classes
pub fn class_count() -> usize {
    CLASSES.len()
}

/// Remove every declaration
///
/// Use with caution - typically only needed at shutdown.
pub fn clear_classes() {
    CLASSES.clear();
}
