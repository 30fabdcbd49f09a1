//! Order service providing the persistence operations for orders.

use common::ObjectId;
use document_store::DocumentStore;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::line_item::{OrderItem, RawOrderItem};
use crate::money::Money;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{require_id, require_text};

use super::{Order, OrderPatch};

/// Fields written by an order update. Unset fields are left untouched.
#[derive(Debug, Default, Serialize)]
struct OrderFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivery_address: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<Money>,
}

impl OrderFields {
    fn with_items(mut self, items: Vec<RawOrderItem>) -> Result<Self> {
        let (items, total) = Order::price_items(items)?;
        self.items = Some(items);
        self.total = Some(total);
        Ok(self)
    }
}

/// Service for managing orders.
pub struct OrderService<S: DocumentStore> {
    repository: Repository<S, Order>,
}

impl<S: DocumentStore> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Order> {
        &self.repository
    }

    /// Inserts an order and returns its identifier.
    #[tracing::instrument(skip(self, order), fields(user_id = %order.user_id()))]
    pub async fn insert(&self, order: &Order) -> Result<ObjectId> {
        self.repository.insert(order).await
    }

    /// Finds an order by identifier.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<Order>>> {
        let id = require_id(Order::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    /// Lists every order.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<Order>>> {
        self.repository.find_all().await
    }

    /// Sets the order status.
    ///
    /// Returns true whenever the order exists, even if the status did not
    /// change.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: &str) -> Result<bool> {
        let id = require_id(Order::NAME, "id", id)?;
        require_text(Order::NAME, "status", status)?;

        let outcome = self.repository.set(id, &json!({ "status": status })).await?;
        Ok(outcome.is_matched())
    }

    /// Replaces the order items and recomputes the total.
    ///
    /// An empty list is rejected before the store is touched. Returns true
    /// only if the stored order changed.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn replace_items(&self, id: &str, items: Vec<RawOrderItem>) -> Result<bool> {
        let id = require_id(Order::NAME, "id", id)?;
        let fields = OrderFields::default().with_items(items)?;

        let outcome = self.repository.set(id, &fields).await?;
        Ok(outcome.is_modified())
    }

    /// Applies a partial update.
    ///
    /// Status, payment method, delivery address and items are the only
    /// recognized fields. An empty patch still reaches the store and returns
    /// whether the order exists.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: OrderPatch) -> Result<bool> {
        let id = require_id(Order::NAME, "id", id)?;

        let mut fields = OrderFields {
            status: patch.status,
            payment_method: patch.payment_method,
            ..OrderFields::default()
        };
        if let Some(address) = patch.delivery_address {
            fields.delivery_address = Some(require_id(Order::NAME, "delivery_address", &address)?);
        }
        if let Some(items) = patch.items {
            fields = fields.with_items(items)?;
        }

        let outcome = self.repository.set(id, &fields).await?;
        Ok(outcome.is_matched())
    }

    /// Deletes an order.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(Order::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use document_store::InMemoryDocumentStore;

    use super::*;
    use crate::error::DomainError;

    const USER: &str = "65a1b2c3d4e5f60718293a4b";
    const ADDRESS: &str = "65a1b2c3d4e5f60718293a4e";
    const PS5: &str = "65a1b2c3d4e5f60718293a4c";

    async fn seeded() -> (OrderService<InMemoryDocumentStore>, String) {
        let service = OrderService::new(InMemoryDocumentStore::new());
        let order = Order::new(
            USER,
            vec![RawOrderItem::new(PS5, "PlayStation 5", 4299.99, 1)],
            "pending",
            ADDRESS,
            Some("pix"),
        )
        .unwrap();
        let id = service.insert(&order).await.unwrap().to_hex();
        (service, id)
    }

    #[tokio::test]
    async fn update_with_items_recomputes_total() {
        let (service, id) = seeded().await;
        let patch = OrderPatch {
            items: Some(vec![RawOrderItem::new(PS5, "PlayStation 5", "100.005", 1)]),
            ..OrderPatch::default()
        };

        assert!(service.update(&id, patch).await.unwrap());

        let order = service.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(order.total().to_string(), "100.01");
        assert_eq!(order.status(), "pending");
    }

    #[tokio::test]
    async fn empty_patch_reports_existence() {
        let (service, id) = seeded().await;
        assert!(service.update(&id, OrderPatch::default()).await.unwrap());
        assert!(!service.update(USER, OrderPatch::default()).await.unwrap());
    }

    #[tokio::test]
    async fn update_parses_delivery_address() {
        let (service, id) = seeded().await;
        let patch = OrderPatch {
            delivery_address: Some("nowhere".to_string()),
            ..OrderPatch::default()
        };
        assert!(matches!(
            service.update(&id, patch).await,
            Err(DomainError::InvalidIdentifier { field: "delivery_address", .. })
        ));
    }

    #[tokio::test]
    async fn update_status_requires_status() {
        let (service, id) = seeded().await;
        assert!(matches!(
            service.update_status(&id, "").await,
            Err(DomainError::MissingRequiredField { field: "status", .. })
        ));
    }

    #[tokio::test]
    async fn delete_twice() {
        let (service, id) = seeded().await;
        assert!(service.delete(&id).await.unwrap());
        assert!(!service.delete(&id).await.unwrap());
        assert!(service.find_by_id(&id).await.unwrap().is_none());
    }
}
