//! Types shared with the C ABI
//!
//! These are plain `#[repr(C)]` values. The plugin crate converts them to
//! Rust types at the boundary.

use std::ffi::c_char;

/// ABI version reported by `tracehook_get_version`
pub const ABI_VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();

/// Handle value meaning "no hook applies"
pub const NO_DISPATCH: u64 = 0;

/// Borrowed byte buffer (not null-terminated)
///
/// A null `ptr` means the value is absent, which is distinct from an empty
/// string (non-null `ptr`, `len == 0`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TracehookStr {
    pub ptr: *const c_char,
    pub len: usize,
}

impl TracehookStr {
    /// The absent value
    pub const fn null() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
        }
    }

    /// Borrow a Rust string for the duration of a call
    pub fn borrowed(s: &str) -> Self {
        Self {
            ptr: s.as_ptr() as *const c_char,
            len: s.len(),
        }
    }

    /// Whether the value is absent
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// View the buffer as bytes
    ///
    /// # Safety
    /// `ptr` must be null or point to `len` readable bytes that stay valid
    /// for the returned lifetime.
    pub unsafe fn as_bytes<'a>(&self) -> Option<&'a [u8]> {
        if self.ptr.is_null() {
            None
        } else {
            Some(std::slice::from_raw_parts(self.ptr as *const u8, self.len))
        }
    }
}

impl Default for TracehookStr {
    fn default() -> Self {
        Self::null()
    }
}
