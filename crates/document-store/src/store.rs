use std::sync::Arc;

use async_trait::async_trait;

use crate::{Document, ObjectId, Result, UpdateOutcome};

/// Core trait for document store implementations.
///
/// A document store keeps JSON documents in named collections and addresses
/// them by [`ObjectId`]. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns its generated identifier.
    ///
    /// Any `_id` already present in `document` is replaced.
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId>;

    /// Retrieves a document by identifier.
    ///
    /// Returns None if no document has this identifier. The returned
    /// document includes its `_id`.
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>>;

    /// Retrieves every document of a collection in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Sets the top-level fields of a document.
    ///
    /// Fields not present in `fields` are kept. An empty `fields` still
    /// matches an existing document but modifies nothing.
    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome>;

    /// Deletes a document and returns the number of documents removed.
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64>;

    /// Releases the underlying connection.
    ///
    /// Later calls fail with [`crate::DocumentStoreError::Closed`].
    async fn close(&self);
}

/// Extension trait providing convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Checks if a document exists.
    async fn exists(&self, collection: &str, id: ObjectId) -> Result<bool> {
        Ok(self.find_by_id(collection, id).await?.is_some())
    }

    /// Counts the documents of a collection.
    async fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.find_all(collection).await?.len())
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId> {
        (**self).insert(collection, document).await
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        (**self).find_by_id(collection, id).await
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        (**self).find_all(collection).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome> {
        (**self).update_by_id(collection, id, fields).await
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64> {
        (**self).delete_by_id(collection, id).await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
