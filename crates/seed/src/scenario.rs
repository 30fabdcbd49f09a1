//! The seed scenario.

use common::ObjectId;
use document_store::DocumentStore;
use domain::{
    Address, Cart, Category, DomainError, Money, NewProduct, NewUser, Order, Payment, Product,
    RawCartItem, RawOrderItem, Storefront, User, UserPatch,
};
use serde_json::json;
use thiserror::Error;

/// Errors that stop the seed scenario.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A domain operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A document inserted earlier in the run could not be read back.
    #[error("{entity} {id} disappeared during the seed run")]
    Vanished { entity: &'static str, id: String },
}

/// Identifiers and totals produced by a seed run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub category_ids: Vec<ObjectId>,
    pub user_ids: Vec<ObjectId>,
    pub product_ids: Vec<ObjectId>,
    pub cart_id: ObjectId,
    pub order_id: ObjectId,
    pub payment_id: ObjectId,
    pub cart_total: Money,
    pub order_total: Money,
}

fn vanished(entity: &'static str, id: ObjectId) -> SeedError {
    SeedError::Vanished {
        entity,
        id: id.to_hex(),
    }
}

/// Runs the full seed scenario against `storefront`.
///
/// Steps: two categories, two users (one of them updated), two consoles
/// (one of them updated), a cart holding both consoles, an order built from
/// the stored cart, a status change on that order, and a payment for the
/// order total. The storefront's store is left open.
#[tracing::instrument(skip(storefront))]
pub async fn run_scenario<S>(storefront: &Storefront<S>) -> Result<SeedReport, SeedError>
where
    S: DocumentStore + Clone,
{
    tracing::info!("starting seed scenario");

    // categories
    let console = storefront
        .categories
        .insert(&Category::new("Console", "Video game consoles and related accessories.")?)
        .await?;
    let digital = storefront
        .categories
        .insert(&Category::new("Digital Game", "Games for download on digital platforms.")?)
        .await?;
    storefront.categories.find_all().await?;

    // users
    let alice = storefront
        .users
        .insert(&User::new(NewUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            phone: None,
            addresses: Some(vec![
                Address::new("Rua Goias", "42")
                    .with_city("Londrina", "PR")
                    .with_zip_code("12345-001"),
            ]),
        })?)
        .await?;
    let luccas = storefront
        .users
        .insert(&User::new(NewUser {
            name: "Luccas".to_string(),
            email: "luccas@example.com".to_string(),
            password: "hash456".to_string(),
            phone: None,
            addresses: Some(vec![
                Address::new("Rua das Americas", "110")
                    .with_city("São Paulo", "SP")
                    .with_zip_code("98765-432"),
            ]),
        })?)
        .await?;
    storefront.users.find_all().await?;
    storefront
        .users
        .find_by_id(&alice.to_hex())
        .await?
        .ok_or_else(|| vanished("user", alice))?;

    let patch = UserPatch {
        phone: Some("11999998888".to_string()),
        addresses: Some(vec![Address::new("Rua Nova", "10")]),
        ..UserPatch::default()
    };
    storefront.users.update(&alice.to_hex(), &patch).await?;
    storefront.users.find_by_id(&alice.to_hex()).await?;

    // products
    let ps5 = storefront
        .products
        .insert(&Product::new(NewProduct::new(
            "PlayStation 5",
            4299.99,
            console.to_hex(),
            "Sony",
            "Next generation console with an ultra fast SSD.",
        ))?)
        .await?;
    let xbox = storefront
        .products
        .insert(&Product::new(NewProduct::new(
            "Xbox Series X",
            4000.00,
            console.to_hex(),
            "Microsoft",
            "The most powerful Microsoft console.",
        ))?)
        .await?;
    storefront.products.find_all().await?;

    let stored_ps5 = storefront
        .products
        .find_by_id(&ps5.to_hex())
        .await?
        .ok_or_else(|| vanished("product", ps5))?;
    let mut input = NewProduct::from(&stored_ps5.entity);
    input.description = "Console with a disc drive and a new description.".to_string();
    storefront.products.update(&ps5.to_hex(), input).await?;

    // cart
    let cart = Cart::new(
        &alice.to_hex(),
        vec![
            RawCartItem::new(ps5.to_hex(), 4299.99, 1),
            RawCartItem::new(xbox.to_hex(), 4000.00, 1),
        ],
    )?;
    let cart_id = storefront.carts.insert(&cart).await?;
    storefront.carts.find_all().await?;
    let stored_cart = storefront
        .carts
        .find_by_id(&cart_id.to_hex())
        .await?
        .ok_or_else(|| vanished("cart", cart_id))?;

    // order built from the stored cart lines
    let order_items = stored_cart
        .items()
        .iter()
        .map(|item| {
            let product = item.product_id().to_hex();
            RawOrderItem::new(
                product.as_str(),
                format!("Product {}", &product[..5]),
                item.price().to_string(),
                item.quantity(),
            )
        })
        .collect();
    let delivery_address = ObjectId::new();
    let order = Order::new(
        &alice.to_hex(),
        order_items,
        "pending",
        &delivery_address.to_hex(),
        Some("pix"),
    )?;
    let order_id = storefront.orders.insert(&order).await?;
    storefront.orders.find_all().await?;

    storefront
        .orders
        .update_status(&order_id.to_hex(), "processing")
        .await?;
    let stored_order = storefront
        .orders
        .find_by_id(&order_id.to_hex())
        .await?
        .ok_or_else(|| vanished("order", order_id))?;

    // payment for the order total
    let payment = Payment::new(
        &order_id.to_hex(),
        &json!(stored_order.total().to_string()),
        "approved",
        "pix",
    )?;
    let payment_id = storefront.payments.insert(&payment).await?;
    storefront.payments.find_all().await?;

    tracing::info!(
        %order_id,
        cart_total = %stored_cart.total(),
        order_total = %stored_order.total(),
        "seed scenario finished"
    );
    Ok(SeedReport {
        category_ids: vec![console, digital],
        user_ids: vec![alice, luccas],
        product_ids: vec![ps5, xbox],
        cart_id,
        order_id,
        payment_id,
        cart_total: stored_cart.total(),
        order_total: stored_order.total(),
    })
}
