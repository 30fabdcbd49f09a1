//! Domain error types.

use common::IdError;
use document_store::DocumentStoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was absent, null or falsy.
    #[error("{entity}: {field} is required")]
    MissingRequiredField {
        entity: &'static str,
        field: &'static str,
    },

    /// A reference could not be parsed into an identifier.
    #[error("{entity}: invalid identifier for {field}: '{value}' ({source})")]
    InvalidIdentifier {
        entity: &'static str,
        field: &'static str,
        value: String,
        #[source]
        source: IdError,
    },

    /// A price or amount is not a decimal number, or a computed total leaves
    /// the decimal range.
    #[error("{entity}: invalid monetary value for {field}: '{value}'")]
    InvalidMonetaryValue {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A quantity is not a positive integer.
    #[error("{entity}: invalid quantity '{value}' (must be a positive integer)")]
    InvalidQuantity { entity: &'static str, value: String },

    /// The document store failed.
    #[error("Failed to {operation} {entity}: {source}")]
    Persistence {
        operation: &'static str,
        entity: &'static str,
        #[source]
        source: DocumentStoreError,
    },
}

impl DomainError {
    /// Returns true for errors raised before any I/O.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DomainError::Persistence { .. })
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
