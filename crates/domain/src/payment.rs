//! Payments recorded against orders.

use chrono::{DateTime, Utc};
use common::ObjectId;
use document_store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::money::Money;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{missing, parse_id, parse_money, require_id, require_non_null, require_text};

/// A payment for an order.
///
/// The amount keeps the precision it was given and may be zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    order_id: ObjectId,
    amount: Money,
    status: String,
    method: String,
    paid_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment stamped with the current time.
    pub fn new(order_id: &str, amount: &Value, status: &str, method: &str) -> Result<Self> {
        require_text(Self::NAME, "order_id", order_id)?;
        require_non_null(Self::NAME, "amount", amount)?;
        require_text(Self::NAME, "status", status)?;
        require_text(Self::NAME, "method", method)?;

        let order_id = parse_id(Self::NAME, "order_id", order_id)?;
        let amount = parse_money(Self::NAME, "amount", amount)?;

        tracing::info!(%order_id, %amount, status, method, "payment validated");
        Ok(Self {
            order_id,
            amount,
            status: status.to_string(),
            method: method.to_string(),
            paid_at: Utc::now(),
        })
    }

    pub fn order_id(&self) -> ObjectId {
        self.order_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn paid_at(&self) -> DateTime<Utc> {
        self.paid_at
    }
}

impl Entity for Payment {
    const COLLECTION: &'static str = "payments";
    const NAME: &'static str = "payment";
}

/// Service for managing payments.
pub struct PaymentService<S: DocumentStore> {
    repository: Repository<S, Payment>,
}

impl<S: DocumentStore> PaymentService<S> {
    /// Creates a new payment service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Payment> {
        &self.repository
    }

    #[tracing::instrument(skip(self, payment), fields(order_id = %payment.order_id))]
    pub async fn insert(&self, payment: &Payment) -> Result<ObjectId> {
        self.repository.insert(payment).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<Payment>>> {
        let id = require_id(Payment::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<Payment>>> {
        self.repository.find_all().await
    }

    /// Sets the payment status.
    ///
    /// Returns true whenever the payment exists, even if the status was
    /// already `status`.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: &str) -> Result<bool> {
        let id = require_id(Payment::NAME, "id", id)?;
        if status.is_empty() {
            return Err(missing(Payment::NAME, "status"));
        }

        let outcome = self.repository.set(id, &json!({ "status": status })).await?;
        Ok(outcome.is_matched())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(Payment::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}
