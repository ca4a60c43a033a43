use listing_core::Error as ListingError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Listing '{listing}' is not provisioned: {message}")]
    NotProvisioned { listing: &'static str, message: String },

    #[error("Listing '{listing}' storage unavailable: {message}")]
    StoreUnavailable { listing: &'static str, message: String },
}

impl DomainError {
    pub fn from_listing(listing: &'static str, err: ListingError) -> Self {
        match err {
            ListingError::NotProvisioned(message) => Self::NotProvisioned { listing, message },
            ListingError::StoreUnavailable(message) => Self::StoreUnavailable { listing, message },
        }
    }

    pub fn listing(&self) -> &'static str {
        match self {
            Self::NotProvisioned { listing, .. } | Self::StoreUnavailable { listing, .. } => listing,
        }
    }
}

impl From<DomainError> for crate::contract::error::ListingsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotProvisioned { .. } => Self::NotProvisioned,
            DomainError::StoreUnavailable { .. } => Self::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::error::ListingsError;

    #[test]
    fn listing_errors_keep_their_kind() {
        let e = DomainError::from_listing("jobs", ListingError::NotProvisioned("no such table".into()));
        assert_eq!(e.listing(), "jobs");
        assert_eq!(ListingsError::from(e), ListingsError::NotProvisioned);

        let e = DomainError::from_listing(
            "offers",
            ListingError::StoreUnavailable("pool timed out".into()),
        );
        assert!(e.to_string().contains("offers"));
        assert_eq!(ListingsError::from(e), ListingsError::Unavailable);
    }
}
