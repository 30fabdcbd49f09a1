//! All entity services sharing one store handle.

use document_store::DocumentStore;

use crate::cart::CartService;
use crate::category::CategoryService;
use crate::order::OrderService;
use crate::payment::PaymentService;
use crate::product::ProductService;
use crate::user::UserService;

/// Bundles the six entity services over clones of the same store handle.
///
/// The storefront never closes the store on its own; the owner of the
/// handle decides when to call [`Storefront::close`].
pub struct Storefront<S: DocumentStore + Clone> {
    store: S,
    pub categories: CategoryService<S>,
    pub users: UserService<S>,
    pub products: ProductService<S>,
    pub carts: CartService<S>,
    pub orders: OrderService<S>,
    pub payments: PaymentService<S>,
}

impl<S: DocumentStore + Clone> Storefront<S> {
    /// Creates every service over `store`.
    pub fn new(store: S) -> Self {
        Self {
            categories: CategoryService::new(store.clone()),
            users: UserService::new(store.clone()),
            products: ProductService::new(store.clone()),
            carts: CartService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            payments: PaymentService::new(store.clone()),
            store,
        }
    }

    /// Returns the shared store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Closes the shared store handle.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
