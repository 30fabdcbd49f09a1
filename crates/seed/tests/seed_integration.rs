//! Runs the seed scenario end to end on the in-memory store.

use document_store::{DocumentStore, DocumentStoreExt, InMemoryDocumentStore};
use domain::{DomainError, Storefront};
use rust_decimal_macros::dec;
use seed::{SeedError, run_scenario};

#[tokio::test]
async fn seed_populates_every_collection() {
    let storefront = Storefront::new(InMemoryDocumentStore::new());
    let report = run_scenario(&storefront).await.unwrap();

    let store = storefront.store();
    assert_eq!(store.count("categories").await.unwrap(), 2);
    assert_eq!(store.count("users").await.unwrap(), 2);
    assert_eq!(store.count("products").await.unwrap(), 2);
    assert_eq!(store.count("carts").await.unwrap(), 1);
    assert_eq!(store.count("orders").await.unwrap(), 1);
    assert_eq!(store.count("payments").await.unwrap(), 1);

    assert_eq!(report.cart_total.amount(), dec!(8299.99));
    assert_eq!(report.order_total, report.cart_total);
    assert!(!store.is_closed());
}

#[tokio::test]
async fn seed_applies_updates() {
    let storefront = Storefront::new(InMemoryDocumentStore::new());
    let report = run_scenario(&storefront).await.unwrap();

    let alice = storefront
        .users
        .find_by_id(&report.user_ids[0].to_hex())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice.phone(), Some("11999998888"));
    assert_eq!(alice.addresses()[0].street, "Rua Nova");

    let ps5 = storefront
        .products
        .find_by_id(&report.product_ids[0].to_hex())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ps5.description(), "Console with a disc drive and a new description.");
    assert_eq!(ps5.price().amount(), dec!(4299.99));

    let order = storefront
        .orders
        .find_by_id(&report.order_id.to_hex())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status(), "processing");
    assert_eq!(order.items().len(), 2);
    assert_eq!(order.payment_method(), Some("pix"));

    let payment = storefront
        .payments
        .find_by_id(&report.payment_id.to_hex())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.order_id(), report.order_id);
    assert_eq!(payment.amount().amount(), dec!(8299.99));
    assert_eq!(payment.status(), "approved");
}

#[tokio::test]
async fn seed_on_closed_store_fails_with_persistence_error() {
    let storefront = Storefront::new(InMemoryDocumentStore::new());
    storefront.store().close().await;

    let err = run_scenario(&storefront).await.unwrap_err();
    assert!(matches!(
        err,
        SeedError::Domain(DomainError::Persistence {
            operation: "insert",
            entity: "category",
            ..
        })
    ));
}
