//! Catalog products.

use common::ObjectId;
use document_store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::money::Money;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{parse_id, parse_money, require_id, require_non_null, require_text};

/// Raw product input as supplied by a client.
///
/// `price` accepts a number or a numeric string. Zero is a valid price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub name: String,
    pub price: Value,
    pub category_id: String,
    pub brand: String,
    pub description: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<Value>,
        category_id: impl Into<String>,
        brand: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category_id: category_id.into(),
            brand: brand.into(),
            description: description.into(),
        }
    }
}

/// A catalog product with a normalized price and category reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    name: String,
    price: Money,
    category_id: ObjectId,
    brand: String,
    description: String,
}

impl Product {
    /// Validates and normalizes a product. Every field is required.
    pub fn new(input: NewProduct) -> Result<Self> {
        require_text(Self::NAME, "name", &input.name)?;
        require_non_null(Self::NAME, "price", &input.price)?;
        require_text(Self::NAME, "category_id", &input.category_id)?;
        require_text(Self::NAME, "brand", &input.brand)?;
        require_text(Self::NAME, "description", &input.description)?;

        let price = parse_money(Self::NAME, "price", &input.price)?;
        let category_id = parse_id(Self::NAME, "category_id", &input.category_id)?;

        tracing::info!(name = %input.name, %price, "product validated");
        Ok(Self {
            name: input.name,
            price,
            category_id,
            brand: input.brand,
            description: input.description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category_id(&self) -> ObjectId {
        self.category_id
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const NAME: &'static str = "product";
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        NewProduct::new(
            product.name.as_str(),
            product.price.to_string(),
            product.category_id.to_hex(),
            product.brand.as_str(),
            product.description.as_str(),
        )
    }
}

/// Service for managing products.
pub struct ProductService<S: DocumentStore> {
    repository: Repository<S, Product>,
}

impl<S: DocumentStore> ProductService<S> {
    /// Creates a new product service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Product> {
        &self.repository
    }

    #[tracing::instrument(skip(self, product), fields(name = %product.name))]
    pub async fn insert(&self, product: &Product) -> Result<ObjectId> {
        self.repository.insert(product).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<Product>>> {
        let id = require_id(Product::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<Product>>> {
        self.repository.find_all().await
    }

    /// Replaces every field of a product.
    ///
    /// The input goes through the same validation as a new product, so the
    /// price and category reference are normalized again. Returns true only
    /// if the stored product changed.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: NewProduct) -> Result<bool> {
        let id = require_id(Product::NAME, "id", id)?;
        let product = Product::new(input)?;

        let outcome = self.repository.set(id, &product).await?;
        Ok(outcome.is_modified())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(Product::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}
