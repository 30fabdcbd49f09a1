//! Generic repository over a document store collection.

use std::marker::PhantomData;

use common::ObjectId;
use document_store::{Document, DocumentStore, DocumentStoreError, UpdateOutcome};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{DomainError, Result};

/// An entity persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection holding this entity.
    const COLLECTION: &'static str;

    /// Human-readable entity name used in errors and logs.
    const NAME: &'static str;
}

/// An entity read back from the store together with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<E> {
    /// Identifier assigned on insert.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// The stored fields.
    #[serde(flatten)]
    pub entity: E,
}

impl<E> std::ops::Deref for Stored<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

/// Serializes an entity or patch into a document.
pub fn to_document<T: Serialize + ?Sized>(collection: &str, value: &T) -> std::result::Result<Document, DocumentStoreError> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument {
            collection: collection.to_string(),
            reason: format!("expected a JSON object, found {other}"),
        }),
    }
}

/// Repository for one entity type.
///
/// Every operation logs its outcome, counts it, and turns store failures
/// into [`DomainError::Persistence`] naming the operation. Missing documents
/// are reported as `None` / `false`, never as errors.
pub struct Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<E>,
}

impl<S, E> Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts an entity and returns its generated identifier.
    pub async fn insert(&self, entity: &E) -> Result<ObjectId> {
        let document = to_document(E::COLLECTION, entity).map_err(|e| self.failure("insert", e))?;
        let id = self
            .store
            .insert(E::COLLECTION, document)
            .await
            .map_err(|e| self.failure("insert", e))?;

        self.record("insert");
        tracing::info!(entity = E::NAME, %id, "document inserted");
        Ok(id)
    }

    /// Retrieves an entity by identifier.
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Stored<E>>> {
        let document = self
            .store
            .find_by_id(E::COLLECTION, id)
            .await
            .map_err(|e| self.failure("find", e))?;

        self.record("find");
        match document {
            Some(document) => {
                let stored = Self::decode(document).map_err(|e| self.failure("find", e))?;
                tracing::info!(entity = E::NAME, %id, "document found");
                Ok(Some(stored))
            }
            None => {
                tracing::warn!(entity = E::NAME, %id, "document not found");
                Ok(None)
            }
        }
    }

    /// Retrieves every entity of the collection.
    pub async fn find_all(&self) -> Result<Vec<Stored<E>>> {
        let documents = self
            .store
            .find_all(E::COLLECTION)
            .await
            .map_err(|e| self.failure("list", e))?;

        let stored = documents
            .into_iter()
            .map(Self::decode)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| self.failure("list", e))?;

        self.record("list");
        tracing::info!(entity = E::NAME, count = stored.len(), "documents listed");
        Ok(stored)
    }

    /// Sets fields on a stored entity.
    pub async fn update(&self, id: ObjectId, fields: Document) -> Result<UpdateOutcome> {
        let outcome = self
            .store
            .update_by_id(E::COLLECTION, id, fields)
            .await
            .map_err(|e| self.failure("update", e))?;

        self.record("update");
        if outcome.is_matched() {
            tracing::info!(
                entity = E::NAME,
                %id,
                modified = outcome.modified,
                "document updated"
            );
        } else {
            tracing::warn!(entity = E::NAME, %id, "document not found for update");
        }
        Ok(outcome)
    }

    /// Serializes `fields` and sets them on a stored entity.
    pub async fn set<T>(&self, id: ObjectId, fields: &T) -> Result<UpdateOutcome>
    where
        T: Serialize + Sync + ?Sized,
    {
        let fields = to_document(E::COLLECTION, fields).map_err(|e| self.failure("update", e))?;
        self.update(id, fields).await
    }

    /// Deletes an entity. Returns false if nothing was deleted.
    pub async fn delete(&self, id: ObjectId) -> Result<bool> {
        let deleted = self
            .store
            .delete_by_id(E::COLLECTION, id)
            .await
            .map_err(|e| self.failure("delete", e))?;

        self.record("delete");
        if deleted == 0 {
            tracing::warn!(entity = E::NAME, %id, "document not found for delete");
            return Ok(false);
        }
        tracing::info!(entity = E::NAME, %id, deleted, "document deleted");
        Ok(true)
    }

    fn decode(document: Document) -> std::result::Result<Stored<E>, DocumentStoreError> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    fn record(&self, operation: &'static str) {
        metrics::counter!(
            "repository_operations_total",
            "collection" => E::COLLECTION,
            "operation" => operation
        )
        .increment(1);
    }

    fn failure(&self, operation: &'static str, source: DocumentStoreError) -> DomainError {
        metrics::counter!(
            "repository_failures_total",
            "collection" => E::COLLECTION,
            "operation" => operation
        )
        .increment(1);
        tracing::error!(entity = E::NAME, operation, error = %source, "document store operation failed");
        DomainError::Persistence {
            operation,
            entity: E::NAME,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use document_store::InMemoryDocumentStore;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";
        const NAME: &'static str = "note";
    }

    fn repository() -> Repository<InMemoryDocumentStore, Note> {
        Repository::new(InMemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn insert_then_find_returns_equal_entity() {
        let repo = repository();
        let note = Note {
            text: "hello".to_string(),
        };

        let id = repo.insert(&note).await.unwrap();
        let stored = repo.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.entity, note);
        assert_eq!(stored.text, "hello");
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repo = repository();
        assert!(repo.find_by_id(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_and_delete_report_not_found() {
        let repo = repository();
        let fields = to_document("notes", &json!({"text": "x"})).unwrap();

        let outcome = repo.update(ObjectId::new(), fields).await.unwrap();
        assert!(!outcome.is_matched());
        assert!(!repo.delete(ObjectId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn store_failures_become_persistence_errors() {
        let repo = repository();
        repo.store().close().await;

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Persistence {
                operation: "list",
                entity: "note",
                source: DocumentStoreError::Closed,
            }
        ));
        assert_eq!(err.to_string(), "Failed to list note: Document store is closed");
    }

    #[tokio::test]
    async fn undecodable_documents_are_persistence_errors() {
        let repo = repository();
        let bad = to_document("notes", &json!({"text": 42})).unwrap();
        repo.store().insert("notes", bad).await.unwrap();

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Persistence {
                source: DocumentStoreError::Serialization(_),
                ..
            }
        ));
    }

    #[test]
    fn to_document_rejects_non_objects() {
        let err = to_document("notes", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, DocumentStoreError::InvalidDocument { .. }));
    }
}
