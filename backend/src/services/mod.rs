//! Business logic services for the Warehouse Inventory Management Platform

pub mod auth;
pub mod category;
pub mod inventory;
pub mod reporting;
pub mod transaction;

pub use auth::AuthService;
pub use category::CategoryService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
pub use transaction::TransactionService;
