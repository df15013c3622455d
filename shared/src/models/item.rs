//! Inventory item model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::StockStatus;

/// A trackable inventory unit held in the central warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    /// Free-text category name, loosely matched against the category list
    pub category: String,
    pub quantity: i32,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    /// Unit purchase price, used by spend analytics
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub model: Option<String>,
    /// Comma-separated list of zero or more serial numbers
    pub serial_number: Option<String>,
    /// Free-text warranty duration, e.g. "3 Years"
    pub warranty: Option<String>,
    pub warranty_expiry_date: Option<NaiveDate>,
    pub location: String,
    pub description: Option<String>,
    pub status: StockStatus,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
