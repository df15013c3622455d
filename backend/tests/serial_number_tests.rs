//! Serial number splitting, duplicate detection and quantity fan-out tests

use proptest::prelude::*;
use shared::validation::{fan_out_quantities, first_duplicate_serial, split_serial_numbers};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_split_trims_and_drops_empties() {
        assert_eq!(
            split_serial_numbers(" SN1 , SN2 ,, SN3 "),
            vec!["SN1", "SN2", "SN3"]
        );
        assert!(split_serial_numbers("").is_empty());
        assert!(split_serial_numbers(" , , ").is_empty());
    }

    #[test]
    fn test_duplicate_names_the_offending_serial_and_item() {
        let existing = vec![
            ("Monitor B".to_string(), "SN100, SN101".to_string()),
            ("Printer C".to_string(), "SN200".to_string()),
        ];
        let candidates = vec!["SN999".to_string(), "SN100".to_string()];

        let hit = first_duplicate_serial(&candidates, &existing);
        assert_eq!(hit, Some(("SN100".to_string(), "Monitor B".to_string())));
    }

    #[test]
    fn test_no_duplicate_when_serials_are_new() {
        let existing = vec![("X".to_string(), "SN1".to_string())];
        let candidates = vec!["SN2".to_string(), "SN3".to_string()];
        assert_eq!(first_duplicate_serial(&candidates, &existing), None);
    }

    #[test]
    fn test_fan_out_puts_remainder_on_first() {
        assert_eq!(fan_out_quantities(10, 3), vec![4, 3, 3]);
        assert_eq!(fan_out_quantities(9, 3), vec![3, 3, 3]);
        assert_eq!(fan_out_quantities(1, 3), vec![1, 0, 0]);
    }

    #[test]
    fn test_fan_out_single_part_keeps_total() {
        assert_eq!(fan_out_quantities(7, 1), vec![7]);
    }

    #[test]
    fn test_fan_out_zero_parts_is_empty() {
        assert!(fan_out_quantities(5, 0).is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Fanned-out quantities always sum back to the total
    #[test]
    fn prop_fan_out_sums_to_total(total in 0i32..100_000, parts in 1usize..50) {
        let shares = fan_out_quantities(total, parts);
        prop_assert_eq!(shares.len(), parts);
        prop_assert_eq!(shares.iter().sum::<i32>(), total);
    }

    /// No share differs from another by more than one
    #[test]
    fn prop_fan_out_is_even(total in 0i32..100_000, parts in 1usize..50) {
        let shares = fan_out_quantities(total, parts);
        let max = shares.iter().max().copied().unwrap_or(0);
        let min = shares.iter().min().copied().unwrap_or(0);
        prop_assert!(max - min <= 1);
    }

    /// Splitting a joined list recovers the original serials
    #[test]
    fn prop_split_round_trips(serials in proptest::collection::vec("[A-Z0-9]{4,12}", 0..10)) {
        let joined = serials.join(", ");
        prop_assert_eq!(split_serial_numbers(&joined), serials);
    }
}
