//! Symbol table - case-insensitive name to dispatch entry mapping
//!
//! Used both as the global function table and as the per-class method table.

use std::collections::HashMap;

use super::entry::{fold_name, DispatchHandle};
use super::error::RegistryError;

#[cfg(test)]
thread_local! {
    static FAIL_INSERTS: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

/// Make every insert on this thread fail with `AllocationFailed`
#[cfg(test)]
pub(crate) fn fail_inserts(fail: bool) {
    FAIL_INSERTS.with(|flag| flag.set(fail));
}

/// Folded symbol name -> dispatch entry
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, DispatchHandle>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry under its folded function name
    ///
    /// Replaces any entry already stored for that name and returns it, so
    /// there is exactly one live entry per symbol.
    pub fn insert(
        &mut self,
        entry: DispatchHandle,
    ) -> Result<Option<DispatchHandle>, RegistryError> {
        #[cfg(test)]
        if FAIL_INSERTS.with(std::cell::Cell::get) {
            return Err(RegistryError::AllocationFailed("forced".into()));
        }
        self.entries.try_reserve(1)?;
        let key = entry.function_name().to_owned();
        Ok(self.entries.insert(key, entry))
    }

    /// Find the entry for `name` (any case)
    ///
    /// The table keeps its own reference; clone the handle to retain it.
    pub fn lookup(&self, name: &str) -> Option<&DispatchHandle> {
        self.lookup_folded(&fold_name(name))
    }

    /// Find the entry for an already folded name
    pub(crate) fn lookup_folded(&self, key: &str) -> Option<&DispatchHandle> {
        self.entries.get(key)
    }

    /// Remove the entry for `name` (any case)
    pub fn remove(&mut self, name: &str) -> Option<DispatchHandle> {
        self.entries.remove(fold_name(name).as_ref())
    }

    /// Release every entry, keeping the allocation for reuse
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folded names of all stored symbols
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
