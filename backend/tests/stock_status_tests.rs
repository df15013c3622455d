//! Stock status and movement arithmetic tests
//!
//! Tests for the threshold status rule and the quantity effects of the
//! different movement types.

use proptest::prelude::*;
use shared::models::TransactionType;
use shared::types::StockStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_zero_quantity_is_out_of_stock() {
        // Zero wins even when min_stock is zero
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(0, 10), StockStatus::OutOfStock);
    }

    #[test]
    fn test_at_threshold_is_low_stock() {
        assert_eq!(StockStatus::derive(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(1, 5), StockStatus::LowStock);
    }

    #[test]
    fn test_above_threshold_is_in_stock() {
        assert_eq!(StockStatus::derive(6, 5), StockStatus::InStock);
        assert_eq!(StockStatus::derive(100, 5), StockStatus::InStock);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(StockStatus::InStock.as_str(), "in-stock");
        assert_eq!(StockStatus::LowStock.as_str(), "low-stock");
        assert_eq!(StockStatus::OutOfStock.as_str(), "out-of-stock");
    }

    #[test]
    fn test_branch_required_for_outgoing_types() {
        assert!(TransactionType::Out.requires_branch());
        assert!(TransactionType::Return.requires_branch());
        assert!(TransactionType::Transfer.requires_branch());
        assert!(!TransactionType::In.requires_branch());
        assert!(!TransactionType::Confirmation.requires_branch());
    }

    #[test]
    fn test_signed_quantity_only_for_branch_stock_types() {
        assert_eq!(TransactionType::Transfer.signed_quantity(4), Some(4));
        assert_eq!(TransactionType::Return.signed_quantity(4), Some(-4));
        assert_eq!(TransactionType::In.signed_quantity(4), None);
        assert_eq!(TransactionType::Out.signed_quantity(4), None);
        assert_eq!(TransactionType::Confirmation.signed_quantity(4), None);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The status function covers every quantity with exactly one status
    #[test]
    fn prop_status_is_total(quantity in 0i32..100_000, min_stock in 0i32..100_000) {
        let status = StockStatus::derive(quantity, min_stock);
        match status {
            StockStatus::OutOfStock => prop_assert_eq!(quantity, 0),
            StockStatus::LowStock => {
                prop_assert!(quantity > 0 && quantity <= min_stock);
            }
            StockStatus::InStock => prop_assert!(quantity > min_stock),
        }
    }

    /// Status strings round-trip through parse
    #[test]
    fn prop_status_round_trips(quantity in 0i32..1000, min_stock in 0i32..1000) {
        let status = StockStatus::derive(quantity, min_stock);
        prop_assert_eq!(StockStatus::parse(status.as_str()), Some(status));
    }

    /// An inbound movement after an outbound one of the same size restores
    /// the original quantity and status
    #[test]
    fn prop_in_undoes_out(
        start in 1i32..10_000,
        moved in 1i32..10_000,
        min_stock in 0i32..100,
    ) {
        prop_assume!(moved <= start);
        let after_out = start - moved;
        let after_in = after_out + moved;
        prop_assert_eq!(after_in, start);
        prop_assert_eq!(
            StockStatus::derive(after_in, min_stock),
            StockStatus::derive(start, min_stock)
        );
    }
}
