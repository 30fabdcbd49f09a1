//! Line-item snapshots and aggregate totals.
//!
//! A snapshot freezes the product reference, unit price and quantity of a
//! cart or order line at the moment it is built, together with its line
//! total. Later price changes on the product never reach an existing
//! snapshot; changing a line means building a new list.

use common::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, Result};
use crate::money::{InvalidMoney, Money};
use crate::validation::{missing, parse_id, parse_money, require_text, require_truthy};

/// A priced line that contributes to an aggregate total.
pub trait LineItem {
    /// Entity whose total is computed from these lines.
    const OWNER: &'static str;

    /// Returns the line total (`unit price * quantity`, rounded to cents).
    fn line_total(&self) -> Money;
}

/// Raw client input that can be frozen into a snapshot.
pub trait RawLineItem {
    /// The snapshot produced from this input.
    type Snapshot: LineItem;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Validates the input and builds its snapshot.
    fn snapshot(self) -> Result<Self::Snapshot>;
}

/// Raw cart line as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCartItem {
    pub product_id: String,
    pub price: Value,
    pub quantity: Value,
}

impl RawCartItem {
    /// Creates a raw cart line.
    pub fn new(
        product_id: impl Into<String>,
        price: impl Into<Value>,
        quantity: impl Into<Value>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }
}

/// Raw order line as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Value,
    pub quantity: Value,
}

impl RawOrderItem {
    /// Creates a raw order line.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: impl Into<Value>,
        quantity: impl Into<Value>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price: unit_price.into(),
            quantity: quantity.into(),
        }
    }
}

/// Snapshot of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    product_id: ObjectId,
    price: Money,
    quantity: u32,
    total: Money,
}

impl CartItem {
    /// Returns the referenced product.
    pub fn product_id(&self) -> ObjectId {
        self.product_id
    }

    /// Returns the unit price captured for this line.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl LineItem for CartItem {
    const OWNER: &'static str = "cart";

    fn line_total(&self) -> Money {
        self.total
    }
}

/// Snapshot of an order line, including the product name at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ObjectId,
    product_name: String,
    unit_price: Money,
    quantity: u32,
    item_total: Money,
}

impl OrderItem {
    /// Returns the referenced product.
    pub fn product_id(&self) -> ObjectId {
        self.product_id
    }

    /// Returns the product name captured at order time.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the unit price captured at order time.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl LineItem for OrderItem {
    const OWNER: &'static str = "order";

    fn line_total(&self) -> Money {
        self.item_total
    }
}

impl RawLineItem for RawCartItem {
    type Snapshot = CartItem;
    const ENTITY: &'static str = "cart item";

    fn snapshot(self) -> Result<CartItem> {
        require_text(Self::ENTITY, "product_id", &self.product_id)?;
        require_truthy(Self::ENTITY, "price", &self.price)?;
        require_truthy(Self::ENTITY, "quantity", &self.quantity)?;

        let product_id = parse_id(Self::ENTITY, "product_id", &self.product_id)?;
        let price = parse_money(Self::ENTITY, "price", &self.price)?;
        let quantity = require_quantity(Self::ENTITY, &self.quantity)?;
        let total = price
            .multiply_and_round(quantity)
            .map_err(|err| out_of_range(Self::ENTITY, "price", err))?;

        Ok(CartItem {
            product_id,
            price,
            quantity,
            total,
        })
    }
}

impl RawLineItem for RawOrderItem {
    type Snapshot = OrderItem;
    const ENTITY: &'static str = "order item";

    fn snapshot(self) -> Result<OrderItem> {
        require_text(Self::ENTITY, "product_id", &self.product_id)?;
        require_text(Self::ENTITY, "product_name", &self.product_name)?;
        require_truthy(Self::ENTITY, "unit_price", &self.unit_price)?;
        require_truthy(Self::ENTITY, "quantity", &self.quantity)?;

        let product_id = parse_id(Self::ENTITY, "product_id", &self.product_id)?;
        let unit_price = parse_money(Self::ENTITY, "unit_price", &self.unit_price)?;
        let quantity = require_quantity(Self::ENTITY, &self.quantity)?;
        let item_total = unit_price
            .multiply_and_round(quantity)
            .map_err(|err| out_of_range(Self::ENTITY, "unit_price", err))?;

        Ok(OrderItem {
            product_id,
            product_name: self.product_name,
            unit_price,
            quantity,
            item_total,
        })
    }
}

/// Parses a quantity the way an integer prefix parse does.
///
/// Numbers are truncated toward zero; strings use their leading integer
/// (`" 4 units"` is 4). Returns None when there is no integer to read, or
/// when it does not fit in a `u32` or is negative.
pub fn parse_quantity(raw: &Value) -> Option<u32> {
    match raw {
        Value::Number(number) => {
            if let Some(whole) = number.as_u64() {
                return u32::try_from(whole).ok();
            }
            let value = number.as_f64()?.trunc();
            if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
                Some(value as u32)
            } else {
                None
            }
        }
        Value::String(text) => {
            let text = text.trim_start();
            let (negative, rest) = match text.as_bytes().first() {
                Some(b'-') => (true, &text[1..]),
                Some(b'+') => (false, &text[1..]),
                _ => (false, text),
            };
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                return None;
            }
            let value: u64 = digits.parse().ok()?;
            if negative && value > 0 {
                return None;
            }
            u32::try_from(value).ok()
        }
        _ => None,
    }
}

fn require_quantity(entity: &'static str, raw: &Value) -> Result<u32> {
    match parse_quantity(raw) {
        Some(quantity) if quantity > 0 => Ok(quantity),
        _ => {
            tracing::warn!(entity, quantity = %raw, "quantity is not a positive integer");
            Err(DomainError::InvalidQuantity {
                entity,
                value: raw.to_string(),
            })
        }
    }
}

/// Builds snapshots for a non-empty list of raw lines.
///
/// Fails with [`DomainError::MissingRequiredField`] when `raw` is empty and
/// stops at the first invalid line.
pub fn snapshot_items<R: RawLineItem>(entity: &'static str, raw: Vec<R>) -> Result<Vec<R::Snapshot>> {
    if raw.is_empty() {
        return Err(missing(entity, "items"));
    }
    raw.into_iter().map(RawLineItem::snapshot).collect()
}

/// Sums the line totals of `items`, rounded to cents.
///
/// Fails with [`DomainError::InvalidMonetaryValue`] on `total` when the sum
/// leaves the decimal range.
pub fn compute_total<I: LineItem>(items: &[I]) -> Result<Money> {
    Money::sum_and_round(items.iter().map(LineItem::line_total))
        .map_err(|err| out_of_range(I::OWNER, "total", err))
}

fn out_of_range(entity: &'static str, field: &'static str, err: InvalidMoney) -> DomainError {
    tracing::error!(entity, field, value = %err.raw, "monetary amount out of range");
    DomainError::InvalidMonetaryValue {
        entity,
        field,
        value: err.raw,
    }
}
