//! Shared types for the storefront data-access layer.

mod types;

pub use types::{IdError, ObjectId};
