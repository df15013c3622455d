//! Branch transfer aggregation tests
//!
//! Tests for grouping net transferred stock into per-branch buckets.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use shared::models::{group_by_branch, TransferredItem};
use uuid::Uuid;

fn row(branch: &str, name: &str, net: i64, minute: u32) -> TransferredItem {
    TransferredItem {
        item_id: Uuid::new_v4(),
        branch: branch.to_string(),
        item_tracking_id: Some(format!("CRE-{}", name)),
        name: name.to_string(),
        category: "IT".to_string(),
        net_quantity: net,
        asset_number: None,
        model: None,
        serial_number: None,
        reason: None,
        last_movement_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, minute, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_groups_rows_by_branch() {
        let rows = vec![
            row("North", "Laptop", 3, 0),
            row("South", "Monitor", 1, 1),
            row("North", "Printer", 2, 2),
        ];

        let grouped = group_by_branch(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].branch, "North");
        assert_eq!(grouped[0].items.len(), 2);
        assert_eq!(grouped[1].branch, "South");
        assert_eq!(grouped[1].items.len(), 1);
    }

    #[test]
    fn test_branches_sorted_by_name() {
        let rows = vec![
            row("Zebra", "A", 1, 0),
            row("Alpha", "B", 1, 1),
            row("Mid", "C", 1, 2),
        ];

        let grouped = group_by_branch(rows);
        let names: Vec<&str> = grouped.iter().map(|g| g.branch.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zebra"]);
    }

    #[test]
    fn test_in_branch_order_preserved() {
        let rows = vec![
            row("North", "Newest", 1, 5),
            row("North", "Older", 1, 3),
            row("North", "Oldest", 1, 1),
        ];

        let grouped = group_by_branch(rows);
        let names: Vec<&str> = grouped[0].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Newest", "Older", "Oldest"]);
    }

    #[test]
    fn test_empty_input_yields_no_branches() {
        assert!(group_by_branch(Vec::new()).is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Grouping never loses or duplicates a row
    #[test]
    fn prop_grouping_preserves_rows(
        branches in proptest::collection::vec(("[A-D]", 1i64..50), 0..30)
    ) {
        let rows: Vec<TransferredItem> = branches
            .iter()
            .enumerate()
            .map(|(i, (b, net))| row(b, &format!("item-{}", i), *net, (i % 60) as u32))
            .collect();
        let total_in = rows.len();

        let grouped = group_by_branch(rows);
        let total_out: usize = grouped.iter().map(|g| g.items.len()).sum();
        prop_assert_eq!(total_in, total_out);
    }

    /// Every bucket only contains rows for its own branch
    #[test]
    fn prop_buckets_are_homogeneous(
        branches in proptest::collection::vec(("[A-D]", 1i64..50), 0..30)
    ) {
        let rows: Vec<TransferredItem> = branches
            .iter()
            .enumerate()
            .map(|(i, (b, net))| row(b, &format!("item-{}", i), *net, (i % 60) as u32))
            .collect();

        for bucket in group_by_branch(rows) {
            for item in &bucket.items {
                prop_assert_eq!(&item.branch, &bucket.branch);
            }
        }
    }
}
