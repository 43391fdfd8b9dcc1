//! Hook option bits
//!
//! The registry never interprets these; they are carried from registration
//! to resolution for the interception layer.

use bitflags::bitflags;

bitflags! {
    /// Behaviour flags attached to a hook
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HookOptions: u32 {
        /// Run the callable after the original returns
        const POSTHOOK = 0x01;
        /// Run the callable before the original
        const PREHOOK = 0x02;
        /// Keep instrumenting when the tracer is rate limited
        const INSTRUMENT_WHEN_LIMITED = 0x04;
        /// Callable does not open a span
        const NON_TRACING = 0x08;
    }
}

impl HookOptions {
    /// Wrap a raw bitmask, keeping bits without a name
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Look up a single flag by name (case-insensitive)
    pub fn from_flag_name(name: &str) -> Option<Self> {
        Self::all()
            .iter_names()
            .find(|(flag, _)| flag.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
