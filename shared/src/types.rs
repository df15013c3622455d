//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Derived stock level of an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Derive the status from the current quantity and the minimum stock
    /// threshold. This is the single source of truth for status: zero means
    /// out of stock, at or below the threshold means low stock.
    pub fn derive(quantity: i32, min_stock: i32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in-stock" => Some(StockStatus::InStock),
            "low-stock" => Some(StockStatus::LowStock),
            "out-of-stock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

/// Account roles on the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Subadmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superadmin => "superadmin",
            UserRole::Subadmin => "subadmin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "superadmin" => Some(UserRole::Superadmin),
            "subadmin" => Some(UserRole::Subadmin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_out_of_stock() {
        assert_eq!(StockStatus::derive(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn at_threshold_is_low_stock() {
        assert_eq!(StockStatus::derive(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(1, 5), StockStatus::LowStock);
    }

    #[test]
    fn above_threshold_is_in_stock() {
        assert_eq!(StockStatus::derive(6, 5), StockStatus::InStock);
        assert_eq!(StockStatus::derive(1, 0), StockStatus::InStock);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            StockStatus::InStock,
            StockStatus::LowStock,
            StockStatus::OutOfStock,
        ] {
            assert_eq!(StockStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StockStatus::parse("unknown"), None);
    }
}
