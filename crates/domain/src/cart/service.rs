//! Cart service.

use common::ObjectId;
use document_store::DocumentStore;
use serde::Serialize;

use crate::error::Result;
use crate::line_item::{CartItem, RawCartItem};
use crate::money::Money;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{missing, parse_id, require_id, require_text};

use super::Cart;

#[derive(Serialize)]
struct ItemsUpdate {
    items: Vec<CartItem>,
    total: Money,
    user_id: ObjectId,
}

/// Service for managing carts.
pub struct CartService<S: DocumentStore> {
    repository: Repository<S, Cart>,
}

impl<S: DocumentStore> CartService<S> {
    /// Creates a new cart service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Cart> {
        &self.repository
    }

    /// Inserts a cart and returns its identifier.
    #[tracing::instrument(skip(self, cart), fields(user_id = %cart.user_id()))]
    pub async fn insert(&self, cart: &Cart) -> Result<ObjectId> {
        self.repository.insert(cart).await
    }

    /// Finds a cart by identifier.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<Cart>>> {
        let id = require_id(Cart::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    /// Lists every cart.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<Cart>>> {
        self.repository.find_all().await
    }

    /// Replaces the items of a cart and recomputes its total.
    ///
    /// The owner reference is required and set again. Returns true only if
    /// the stored cart changed; a missing cart returns false.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn replace_items(
        &self,
        id: &str,
        items: Vec<RawCartItem>,
        user_id: &str,
    ) -> Result<bool> {
        let id = require_id(Cart::NAME, "id", id)?;
        if items.is_empty() {
            return Err(missing(Cart::NAME, "items"));
        }
        require_text(Cart::NAME, "user_id", user_id)?;

        let (items, total) = Cart::price_items(items)?;
        let user_id = parse_id(Cart::NAME, "user_id", user_id)?;

        let update = ItemsUpdate {
            items,
            total,
            user_id,
        };
        let outcome = self.repository.set(id, &update).await?;
        Ok(outcome.is_modified())
    }

    /// Deletes a cart.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(Cart::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}
