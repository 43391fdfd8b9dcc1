//! Error type for registry operations

/// Why a registration was not stored
///
/// Resolution never fails; an unknown or invalid symbol is simply "no hook".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Symbol name is empty")]
    EmptyName,

    #[error("Dispatch registry not initialized")]
    Uninitialized,

    #[error("Symbol name is not valid UTF-8")]
    InvalidEncoding,

    #[error("Failed to grow dispatch table: {0}")]
    AllocationFailed(String),
}

impl From<std::collections::TryReserveError> for RegistryError {
    fn from(err: std::collections::TryReserveError) -> Self {
        RegistryError::AllocationFailed(err.to_string())
    }
}
