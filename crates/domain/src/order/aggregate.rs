//! Order aggregate.

use chrono::{DateTime, Utc};
use common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::line_item::{OrderItem, RawOrderItem, compute_total, snapshot_items};
use crate::money::Money;
use crate::repository::Entity;
use crate::validation::{missing, parse_id, require_text};

/// An order placed by a user.
///
/// Items carry the product name and unit price as they were when the order
/// was built; the total is the rounded sum of their line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    user_id: ObjectId,
    delivery_address: ObjectId,
    items: Vec<OrderItem>,
    total: Money,
    status: String,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order from raw lines.
    ///
    /// Owner, items, status and delivery address are required and checked in
    /// that order before any line is processed. The payment method is
    /// optional.
    pub fn new(
        user_id: &str,
        items: Vec<RawOrderItem>,
        status: &str,
        delivery_address: &str,
        payment_method: Option<&str>,
    ) -> Result<Self> {
        require_text(Self::NAME, "user_id", user_id)?;
        if items.is_empty() {
            return Err(missing(Self::NAME, "items"));
        }
        require_text(Self::NAME, "status", status)?;
        require_text(Self::NAME, "delivery_address", delivery_address)?;

        let user_id = parse_id(Self::NAME, "user_id", user_id)?;
        let delivery_address = parse_id(Self::NAME, "delivery_address", delivery_address)?;
        let (items, total) = Self::price_items(items)?;

        tracing::info!(%user_id, items = items.len(), %total, status, "order validated");
        Ok(Self {
            user_id,
            delivery_address,
            items,
            total,
            status: status.to_string(),
            payment_method: payment_method
                .filter(|method| !method.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        })
    }

    /// Snapshots a non-empty list of raw lines and totals them.
    pub(crate) fn price_items(items: Vec<RawOrderItem>) -> Result<(Vec<OrderItem>, Money)> {
        let items = snapshot_items(Self::NAME, items)?;
        let total = compute_total(&items)?;
        Ok((items, total))
    }

    pub fn user_id(&self) -> ObjectId {
        self.user_id
    }

    pub fn delivery_address(&self) -> ObjectId {
        self.delivery_address
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const NAME: &'static str = "order";
}

/// Partial order update.
///
/// Only these fields can be changed after creation. Setting `items`
/// recomputes every line and the order total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub delivery_address: Option<String>,
    pub items: Option<Vec<RawOrderItem>>,
}

impl OrderPatch {
    /// A patch that only changes the status.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Returns true if the patch sets no field.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.payment_method.is_none()
            && self.delivery_address.is_none()
            && self.items.is_none()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::DomainError;
    use crate::line_item::LineItem;

    const USER: &str = "65a1b2c3d4e5f60718293a4b";
    const ADDRESS: &str = "65a1b2c3d4e5f60718293a4e";
    const PS5: &str = "65a1b2c3d4e5f60718293a4c";

    fn items() -> Vec<RawOrderItem> {
        vec![RawOrderItem::new(PS5, "PlayStation 5", "4299.99", 2)]
    }

    #[test]
    fn new_snapshots_name_and_price() {
        let order = Order::new(USER, items(), "pending", ADDRESS, Some("pix")).unwrap();

        assert_eq!(order.items()[0].product_name(), "PlayStation 5");
        assert_eq!(order.items()[0].line_total().amount(), dec!(8599.98));
        assert_eq!(order.total().amount(), dec!(8599.98));
        assert_eq!(order.payment_method(), Some("pix"));
        assert_eq!(order.delivery_address().to_hex(), ADDRESS);
    }

    #[test]
    fn payment_method_is_optional() {
        let order = Order::new(USER, items(), "pending", ADDRESS, None).unwrap();
        assert_eq!(order.payment_method(), None);
    }

    #[test]
    fn required_fields_are_checked_before_items() {
        let bad_items = vec![RawOrderItem::default()];
        let cases = [
            ("", "pending", ADDRESS, "user_id"),
            (USER, "", ADDRESS, "status"),
            (USER, "pending", "", "delivery_address"),
        ];
        for (user, status, address, expected) in cases {
            let err = Order::new(user, bad_items.clone(), status, address, None).unwrap_err();
            assert!(
                matches!(err, DomainError::MissingRequiredField { field, .. } if field == expected),
                "expected {expected}, got {err}"
            );
        }
    }

    #[test]
    fn malformed_delivery_address_is_invalid() {
        let err = Order::new(USER, items(), "pending", "pix", None).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidIdentifier { field: "delivery_address", .. }
        ));
    }

    #[test]
    fn empty_items_are_rejected() {
        let err = Order::new(USER, Vec::new(), "pending", ADDRESS, None).unwrap_err();
        assert!(matches!(err, DomainError::MissingRequiredField { field: "items", .. }));
    }

    #[test]
    fn patch_emptiness() {
        assert!(OrderPatch::default().is_empty());
        assert!(!OrderPatch::status("shipped").is_empty());
    }
}
