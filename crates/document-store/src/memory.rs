use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{apply_set, document_id, with_id};
use crate::{Document, DocumentStoreError, ObjectId, Result, UpdateOutcome, store::DocumentStore};

/// In-memory document store implementation for testing.
///
/// This implementation keeps every collection in memory and provides
/// the same interface as the PostgreSQL implementation. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents stored in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns true once [`DocumentStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(DocumentStoreError::Closed);
        }
        Ok(())
    }
}

fn position_of(documents: &[Document], id: ObjectId) -> Option<usize> {
    documents
        .iter()
        .position(|document| document_id(document) == Some(id))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId> {
        self.ensure_open()?;

        let id = ObjectId::new();
        let mut store = self.collections.write().await;
        store
            .entry(collection.to_string())
            .or_default()
            .push(with_id(id, document));

        Ok(id)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.ensure_open()?;

        let store = self.collections.read().await;
        let found = store.get(collection).and_then(|documents| {
            position_of(documents, id).map(|index| documents[index].clone())
        });
        Ok(found)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.ensure_open()?;

        let store = self.collections.read().await;
        Ok(store.get(collection).cloned().unwrap_or_default())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome> {
        self.ensure_open()?;

        let mut store = self.collections.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(UpdateOutcome::not_found());
        };
        let Some(index) = position_of(documents, id) else {
            return Ok(UpdateOutcome::not_found());
        };

        let changed = apply_set(&mut documents[index], &fields);
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64> {
        self.ensure_open()?;

        let mut store = self.collections.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(0);
        };
        match position_of(documents, id) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("in-memory document store closed");
        }
    }
}
