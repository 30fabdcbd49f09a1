//! Orders.

mod aggregate;
mod service;

pub use aggregate::{Order, OrderPatch};
pub use service::OrderService;
