//! Domain models for the Warehouse Inventory Management Platform

mod category;
mod extraction;
mod item;
mod transaction;
mod user;

pub use category::*;
pub use extraction::*;
pub use item::*;
pub use transaction::*;
pub use user::*;
