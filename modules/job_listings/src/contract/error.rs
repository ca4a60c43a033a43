use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingsError {
    #[error("Listing storage is not provisioned")]
    NotProvisioned,

    #[error("Listing storage is unavailable")]
    Unavailable,
}

impl ListingsError {
    pub fn not_provisioned() -> Self {
        Self::NotProvisioned
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }
}
