//! Cart aggregate.

use chrono::{DateTime, Utc};
use common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::line_item::{CartItem, RawCartItem, compute_total, snapshot_items};
use crate::money::Money;
use crate::repository::Entity;
use crate::validation::{missing, parse_id, require_text};

/// A user's cart with frozen line items and their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    user_id: ObjectId,
    items: Vec<CartItem>,
    total: Money,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Builds a cart for `user_id` from raw lines.
    ///
    /// The owner and a non-empty item list are checked before any line is
    /// processed.
    pub fn new(user_id: &str, items: Vec<RawCartItem>) -> Result<Self> {
        require_text(Self::NAME, "user_id", user_id)?;
        if items.is_empty() {
            return Err(missing(Self::NAME, "items"));
        }

        let user_id = parse_id(Self::NAME, "user_id", user_id)?;
        let (items, total) = Self::price_items(items)?;

        tracing::info!(%user_id, items = items.len(), %total, "cart validated");
        Ok(Self {
            user_id,
            items,
            total,
            created_at: Utc::now(),
        })
    }

    /// Snapshots a non-empty list of raw lines and totals them.
    pub(crate) fn price_items(items: Vec<RawCartItem>) -> Result<(Vec<CartItem>, Money)> {
        let items = snapshot_items(Self::NAME, items)?;
        let total = compute_total(&items)?;
        Ok((items, total))
    }

    pub fn user_id(&self) -> ObjectId {
        self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Cart {
    const COLLECTION: &'static str = "carts";
    const NAME: &'static str = "cart";
}
