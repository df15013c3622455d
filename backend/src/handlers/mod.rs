//! HTTP request handlers

pub mod auth;
pub mod category;
pub mod health;
pub mod inventory;
pub mod reporting;
pub mod transaction;

pub use auth::{create_subadmin, delete_subadmin, list_subadmins, login, me, register};
pub use category::{create_category, delete_category, list_categories, update_category};
pub use health::health_check;
pub use inventory::{
    create_items, delete_item, extract_invoice, get_item, list_items, update_item,
};
pub use reporting::{get_spending, get_stats};
pub use transaction::{
    confirm_replacement, create_transaction, create_transfer, delete_audit_log, get_audit_logs,
    get_branches, get_item_transactions, get_pending_replacements, get_transferred_items,
};
