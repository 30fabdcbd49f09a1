pub mod config;
pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::ObjectId;
pub use config::StoreConfig;
pub use document::{Document, ID_FIELD, UpdateOutcome};
pub use error::{DocumentStoreError, Result};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{DocumentStore, DocumentStoreExt};
