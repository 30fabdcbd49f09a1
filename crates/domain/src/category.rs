//! Product categories.

use document_store::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{require_id, require_text};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    description: String,
}

impl Category {
    /// Creates a category. Both fields are required.
    pub fn new(name: &str, description: &str) -> Result<Self> {
        let name = require_text(Self::NAME, "name", name)?;
        let description = require_text(Self::NAME, "description", description)?;

        tracing::info!(name, "category validated");
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Category {
    const COLLECTION: &'static str = "categories";
    const NAME: &'static str = "category";
}

/// Service for managing categories.
pub struct CategoryService<S: DocumentStore> {
    repository: Repository<S, Category>,
}

impl<S: DocumentStore> CategoryService<S> {
    /// Creates a new category service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Category> {
        &self.repository
    }

    /// Inserts a category and returns its identifier.
    #[tracing::instrument(skip(self, category))]
    pub async fn insert(&self, category: &Category) -> Result<common::ObjectId> {
        self.repository.insert(category).await
    }

    /// Finds a category by identifier.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<Category>>> {
        let id = require_id(Category::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    /// Lists every category.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<Category>>> {
        self.repository.find_all().await
    }

    /// Replaces name and description.
    ///
    /// Returns true only if the stored category changed.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, name: &str, description: &str) -> Result<bool> {
        let id = require_id(Category::NAME, "id", id)?;
        let category = Category::new(name, description)?;

        let outcome = self.repository.set(id, &category).await?;
        Ok(outcome.is_modified())
    }

    /// Deletes a category.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(Category::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}
