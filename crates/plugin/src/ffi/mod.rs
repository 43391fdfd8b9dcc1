//! C ABI
//!
//! - [`exports`] - `tracehook_*` functions called by the host
//! - [`handles`] - Dispatch handles pinned across the boundary

pub mod exports;
pub mod handles;

/// Serialises tests that touch the process-wide registry and handle table
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());
