//! Dispatch handles held by the host
//!
//! A successful lookup through the C ABI pins a copy of the entry in a slot
//! and hands the host the slot key. The entry stays readable until the host
//! releases the key, whatever happens to the registry in between.

use std::sync::LazyLock;

use parking_lot::RwLock;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use tracehook_core::DispatchHandle;
use tracehook_sdk::NO_DISPATCH;

new_key_type! {
    /// Slot key for a pinned dispatch entry
    pub struct DispatchKey;
}

/// Global table of pinned entries
static HANDLES: LazyLock<RwLock<SlotMap<DispatchKey, DispatchHandle>>> =
    LazyLock::new(|| RwLock::new(SlotMap::with_key()));

/// Pin an entry and return its FFI handle (never [`NO_DISPATCH`])
pub fn pin(entry: DispatchHandle) -> u64 {
    let key = HANDLES.write().insert(entry);
    key.data().as_ffi()
}

fn key_of(handle: u64) -> Option<DispatchKey> {
    if handle == NO_DISPATCH {
        None
    } else {
        Some(DispatchKey::from(KeyData::from_ffi(handle)))
    }
}

/// Run `f` against a pinned entry
pub fn with_entry<T>(handle: u64, f: impl FnOnce(&DispatchHandle) -> T) -> Option<T> {
    let key = key_of(handle)?;
    HANDLES.read().get(key).map(f)
}

/// Release a pinned entry; returns `false` for unknown handles
pub fn release(handle: u64) -> bool {
    key_of(handle)
        .and_then(|key| HANDLES.write().remove(key))
        .is_some()
}

/// Number of entries currently pinned
pub fn pinned_count() -> usize {
    HANDLES.read().len()
}

/// Release every pinned entry
///
/// Use with caution - typically only needed at shutdown.
pub fn release_all() {
    let mut handles = HANDLES.write();
    let count = handles.len();
    handles.clear();
    if count > 0 {
        tracing::debug!("Released {} outstanding dispatch handles", count);
    }
}
