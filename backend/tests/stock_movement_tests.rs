//! Stock movement planning tests
//!
//! Tests for movement request validation and the stock effect computed
//! against an item's current quantity and low-stock threshold.

use proptest::prelude::*;
use shared::models::{plan_movement, validate_movement, MovementError, TransactionType};
use shared::types::StockStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_quantity() {
        for q in [0, -1, -50] {
            assert_eq!(
                validate_movement(TransactionType::In, q, None, None),
                Err(MovementError::NonPositiveQuantity)
            );
        }
    }

    #[test]
    fn test_branch_required_for_out_return_transfer() {
        for t in [
            TransactionType::Out,
            TransactionType::Return,
            TransactionType::Transfer,
        ] {
            assert_eq!(
                validate_movement(t, 5, None, Some("CRE100")),
                Err(MovementError::BranchMissing)
            );
            assert_eq!(
                validate_movement(t, 5, Some("   "), Some("CRE100")),
                Err(MovementError::BranchMissing)
            );
        }
    }

    #[test]
    fn test_transfer_requires_tracking_id() {
        assert_eq!(
            validate_movement(TransactionType::Transfer, 5, Some("North"), None),
            Err(MovementError::TrackingIdMissing)
        );
        assert_eq!(
            validate_movement(TransactionType::Transfer, 5, Some("North"), Some("")),
            Err(MovementError::TrackingIdMissing)
        );
        assert_eq!(
            validate_movement(TransactionType::Transfer, 5, Some("North"), Some("CRE100")),
            Ok(())
        );
    }

    #[test]
    fn test_in_needs_neither_branch_nor_tracking() {
        assert_eq!(validate_movement(TransactionType::In, 5, None, None), Ok(()));
    }

    #[test]
    fn test_overdraw_is_rejected() {
        for t in [TransactionType::Out, TransactionType::Transfer] {
            assert_eq!(
                plan_movement(t, 6, 5, 2),
                Err(MovementError::InsufficientStock)
            );
        }
    }

    #[test]
    fn test_drain_to_zero_deletes_item() {
        for t in [TransactionType::Out, TransactionType::Transfer] {
            let plan = plan_movement(t, 5, 5, 2).unwrap();
            assert_eq!(plan.new_quantity, 0);
            assert_eq!(plan.new_status, StockStatus::OutOfStock);
            assert!(plan.delete_item);
        }
    }

    #[test]
    fn test_partial_outgoing_keeps_item() {
        let plan = plan_movement(TransactionType::Transfer, 3, 5, 2).unwrap();
        assert_eq!(plan.new_quantity, 2);
        assert_eq!(plan.new_status, StockStatus::LowStock);
        assert!(!plan.delete_item);
    }

    #[test]
    fn test_inbound_never_deletes_item() {
        for t in [TransactionType::In, TransactionType::Return] {
            let plan = plan_movement(t, 4, 0, 2).unwrap();
            assert_eq!(plan.new_quantity, 4);
            assert!(!plan.delete_item);
        }
    }

    /// A return against a reconstructed item (quantity zero) restores exactly
    /// the returned quantity.
    #[test]
    fn test_return_against_empty_item_restores_returned_quantity() {
        let plan = plan_movement(TransactionType::Return, 7, 0, 2).unwrap();
        assert_eq!(plan.new_quantity, 7);
        assert_eq!(plan.new_status, StockStatus::InStock);
        assert!(!plan.delete_item);
    }

    #[test]
    fn test_inbound_overflow_is_rejected() {
        assert_eq!(
            plan_movement(TransactionType::In, 1, i32::MAX, 2),
            Err(MovementError::QuantityOverflow)
        );
        assert_eq!(
            plan_movement(TransactionType::Return, i32::MAX, 1, 2),
            Err(MovementError::QuantityOverflow)
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// An outgoing movement succeeds exactly when stock covers it, and then
    /// leaves current minus requested behind.
    #[test]
    fn prop_outgoing_succeeds_iff_covered(
        quantity in 1i32..10_000,
        current in 0i32..10_000,
        min_stock in 0i32..100,
    ) {
        for t in [TransactionType::Out, TransactionType::Transfer] {
            match plan_movement(t, quantity, current, min_stock) {
                Ok(plan) => {
                    prop_assert!(quantity <= current);
                    prop_assert_eq!(plan.new_quantity, current - quantity);
                }
                Err(e) => {
                    prop_assert!(quantity > current);
                    prop_assert_eq!(e, MovementError::InsufficientStock);
                }
            }
        }
    }

    /// Inbound movements add the full quantity
    #[test]
    fn prop_inbound_adds_quantity(
        quantity in 1i32..10_000,
        current in 0i32..10_000,
        min_stock in 0i32..100,
    ) {
        for t in [TransactionType::In, TransactionType::Return] {
            let plan = plan_movement(t, quantity, current, min_stock).unwrap();
            prop_assert_eq!(plan.new_quantity, current + quantity);
            prop_assert!(!plan.delete_item);
        }
    }

    /// The plan's status always matches the canonical derivation, and only
    /// an outgoing drain to zero marks the item for deletion.
    #[test]
    fn prop_status_and_deletion_are_consistent(
        quantity in 1i32..10_000,
        current in 0i32..10_000,
        min_stock in 0i32..100,
    ) {
        for t in [
            TransactionType::In,
            TransactionType::Out,
            TransactionType::Return,
            TransactionType::Transfer,
        ] {
            if let Ok(plan) = plan_movement(t, quantity, current, min_stock) {
                prop_assert_eq!(
                    plan.new_status,
                    StockStatus::derive(plan.new_quantity, min_stock)
                );
                let outgoing = matches!(t, TransactionType::Out | TransactionType::Transfer);
                prop_assert_eq!(plan.delete_item, outgoing && plan.new_quantity == 0);
            }
        }
    }
}
