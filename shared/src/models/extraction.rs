//! Output shape of the invoice extraction capability
//!
//! The extraction service is opaque to the rest of the system; the core only
//! depends on this declared shape. Every field is defaulted best-effort so a
//! partially extracted invoice still yields usable form data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One item extracted from an uploaded invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedItem {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "default_min_stock", alias = "minStock")]
    pub min_stock: i32,
    /// Unit price when the invoice lists one
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl ExtractedItem {
    /// Placeholder returned when extraction fails outright, so the UI still
    /// gets a row to edit by hand.
    pub fn fallback() -> Self {
        Self {
            name: String::new(),
            category: default_category(),
            quantity: default_quantity(),
            min_stock: default_min_stock(),
            price: None,
            supplier: String::new(),
            model: String::new(),
            serial_number: String::new(),
            warranty: String::new(),
            location: "Warehouse - General".to_string(),
            description: "Failed to extract data from invoice".to_string(),
        }
    }
}

fn default_category() -> String {
    "General".to_string()
}

fn default_quantity() -> i32 {
    1
}

fn default_min_stock() -> i32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let item: ExtractedItem = serde_json::from_str(r#"{"name":"Laptop"}"#).unwrap();
        assert_eq!(item.name, "Laptop");
        assert_eq!(item.category, "General");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.min_stock, 5);
        assert!(item.serial_number.is_empty());
    }
}
