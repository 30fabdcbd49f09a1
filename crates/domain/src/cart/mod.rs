//! Shopping carts.

mod aggregate;
mod service;

pub use aggregate::Cart;
pub use service::CartService;
