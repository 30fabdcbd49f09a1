//! Storefront domain layer over a document store.
//!
//! This crate provides:
//! - Exact decimal money with cent rounding
//! - Line-item snapshots for carts and orders, and their totals
//! - A generic repository with uniform logging and error wrapping
//! - Categories, users, products, carts, orders and payments with their services

pub mod cart;
pub mod category;
pub mod error;
pub mod line_item;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;
pub mod repository;
pub mod storefront;
pub mod user;
pub mod validation;

pub use cart::{Cart, CartService};
pub use category::{Category, CategoryService};
pub use error::{DomainError, Result};
pub use line_item::{
    CartItem, LineItem, OrderItem, RawCartItem, RawLineItem, RawOrderItem, compute_total,
    parse_quantity, snapshot_items,
};
pub use money::{InvalidMoney, Money};
pub use order::{Order, OrderPatch, OrderService};
pub use payment::{Payment, PaymentService};
pub use product::{NewProduct, Product, ProductService};
pub use repository::{Entity, Repository, Stored};
pub use storefront::Storefront;
pub use user::{Address, NewUser, User, UserPatch, UserService};
