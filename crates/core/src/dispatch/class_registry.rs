//! Class registry - class name to per-class symbol table

use std::collections::HashMap;

use super::entry::fold_name;
use super::error::RegistryError;
use super::table::SymbolTable;

/// Folded class name -> method table
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, SymbolTable>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Method table for `class_name`, created empty on first use
    ///
    /// Registration path only. Lookups go through [`ClassRegistry::lookup`],
    /// which never creates tables.
    pub fn get_or_create(&mut self, class_name: &str) -> Result<&mut SymbolTable, RegistryError> {
        let key = fold_name(class_name).into_owned();
        if !self.classes.contains_key(&key) {
            self.classes.try_reserve(1)?;
            tracing::trace!("Creating method table for class '{}'", key);
        }
        Ok(self.classes.entry(key).or_default())
    }

    /// Method table for `class_name` (any case), if one exists
    pub fn lookup(&self, class_name: &str) -> Option<&SymbolTable> {
        self.classes.get(fold_name(class_name).as_ref())
    }

    pub(crate) fn lookup_mut(&mut self, class_name: &str) -> Option<&mut SymbolTable> {
        self.classes.get_mut(fold_name(class_name).as_ref())
    }

    /// Drop the table for `class_name` if it holds no entries
    pub(crate) fn remove_if_empty(&mut self, class_name: &str) {
        let key = fold_name(class_name);
        if self.classes.get(key.as_ref()).is_some_and(SymbolTable::is_empty) {
            self.classes.remove(key.as_ref());
        }
    }

    /// Destroy every method table, keeping the registry usable
    pub fn clear(&mut self) {
        self.classes.clear();
    }

    /// Number of classes with a method table
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total method hooks across all classes
    pub fn hook_count(&self) -> usize {
        self.classes.values().map(SymbolTable::len).sum()
    }
}
