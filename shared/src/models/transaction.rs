//! Stock movement ledger models and the branch aggregation view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::StockStatus;

/// Types of stock movements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock received into the central warehouse
    In,
    /// Stock sent out to a branch
    Out,
    /// Previously transferred stock coming back from a branch
    Return,
    /// Stock moved to a branch under a tracking id
    Transfer,
    /// Acknowledgement of a pending replacement transfer
    Confirmation,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "in",
            TransactionType::Out => "out",
            TransactionType::Return => "return",
            TransactionType::Transfer => "transfer",
            TransactionType::Confirmation => "confirmation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(TransactionType::In),
            "out" => Some(TransactionType::Out),
            "return" => Some(TransactionType::Return),
            "transfer" => Some(TransactionType::Transfer),
            "confirmation" => Some(TransactionType::Confirmation),
            _ => None,
        }
    }

    /// Whether this movement requires a branch
    pub fn requires_branch(&self) -> bool {
        matches!(
            self,
            TransactionType::Out | TransactionType::Return | TransactionType::Transfer
        )
    }

    /// Signed contribution to the net quantity held at a branch. Transfers
    /// add to the branch, returns subtract; other types do not participate
    /// in branch aggregation.
    pub fn signed_quantity(&self, quantity: i32) -> Option<i64> {
        match self {
            TransactionType::Transfer => Some(quantity as i64),
            TransactionType::Return => Some(-(quantity as i64)),
            _ => None,
        }
    }
}

/// Why a movement request cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementError {
    NonPositiveQuantity,
    BranchMissing,
    TrackingIdMissing,
    InsufficientStock,
    QuantityOverflow,
}

/// The computed effect of a movement on one item's stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementPlan {
    pub new_quantity: i32,
    pub new_status: StockStatus,
    /// Outgoing movements that drain the quantity to zero remove the item
    pub delete_item: bool,
}

/// Shape validation shared by all movement writes, checked before the item
/// is even looked up: positive quantity, branch present for
/// out/return/transfer, tracking id present for transfer.
pub fn validate_movement(
    transaction_type: TransactionType,
    quantity: i32,
    branch: Option<&str>,
    item_tracking_id: Option<&str>,
) -> Result<(), MovementError> {
    if quantity <= 0 {
        return Err(MovementError::NonPositiveQuantity);
    }
    if transaction_type.requires_branch() && branch.map_or(true, |b| b.trim().is_empty()) {
        return Err(MovementError::BranchMissing);
    }
    if transaction_type == TransactionType::Transfer
        && item_tracking_id.map_or(true, |t| t.trim().is_empty())
    {
        return Err(MovementError::TrackingIdMissing);
    }
    Ok(())
}

/// Compute the stock effect of a movement against the item's current state.
/// Outgoing movements (out, transfer) may not exceed the current quantity;
/// inbound ones reject quantities that would overflow the counter. The
/// returned plan carries the derived status and the drain-deletion decision.
pub fn plan_movement(
    transaction_type: TransactionType,
    quantity: i32,
    current_quantity: i32,
    min_stock: i32,
) -> Result<MovementPlan, MovementError> {
    let outgoing = matches!(
        transaction_type,
        TransactionType::Out | TransactionType::Transfer
    );
    let new_quantity = if outgoing {
        if quantity > current_quantity {
            return Err(MovementError::InsufficientStock);
        }
        current_quantity - quantity
    } else {
        current_quantity
            .checked_add(quantity)
            .ok_or(MovementError::QuantityOverflow)?
    };

    Ok(MovementPlan {
        new_quantity,
        new_status: StockStatus::derive(new_quantity, min_stock),
        delete_item: outgoing && new_quantity == 0,
    })
}

/// An immutable ledger entry recording one stock movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// The moved item. Not a foreign key: the item may since have been
    /// deleted when a transfer or out drained it to zero.
    pub item_id: Uuid,
    /// Snapshot of the item name at transaction time
    pub item_name: Option<String>,
    /// Snapshot of the item category at transaction time
    pub item_category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub quantity: i32,
    pub branch: Option<String>,
    pub asset_number: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub item_tracking_id: Option<String>,
    pub reason: Option<String>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One (item, tracking id) group currently held at a branch, net of returns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferredItem {
    pub item_id: Uuid,
    pub branch: String,
    pub item_tracking_id: Option<String>,
    pub name: String,
    pub category: String,
    pub net_quantity: i64,
    pub asset_number: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub reason: Option<String>,
    pub last_movement_at: DateTime<Utc>,
}

/// Transferred stock regrouped per branch for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchTransfers {
    pub branch: String,
    pub items: Vec<TransferredItem>,
}

/// Regroup flat (branch, item, tracking id) aggregation rows into one entry
/// per branch. Input order within a branch is preserved; branches come out
/// sorted by name so the result is stable for a given ledger snapshot.
pub fn group_by_branch(rows: Vec<TransferredItem>) -> Vec<BranchTransfers> {
    let mut grouped: Vec<BranchTransfers> = Vec::new();
    for row in rows {
        match grouped.iter_mut().find(|g| g.branch == row.branch) {
            Some(group) => group.items.push(row),
            None => grouped.push(BranchTransfers {
                branch: row.branch.clone(),
                items: vec![row],
            }),
        }
    }
    grouped.sort_by(|a, b| a.branch.cmp(&b.branch));
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(branch: &str, name: &str, net: i64) -> TransferredItem {
        TransferredItem {
            item_id: Uuid::new_v4(),
            branch: branch.to_string(),
            item_tracking_id: Some("CRE100".to_string()),
            name: name.to_string(),
            category: "Electronics".to_string(),
            net_quantity: net,
            asset_number: None,
            model: None,
            serial_number: None,
            reason: None,
            last_movement_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn signed_quantity_only_for_transfer_and_return() {
        assert_eq!(TransactionType::Transfer.signed_quantity(5), Some(5));
        assert_eq!(TransactionType::Return.signed_quantity(5), Some(-5));
        assert_eq!(TransactionType::In.signed_quantity(5), None);
        assert_eq!(TransactionType::Out.signed_quantity(5), None);
        assert_eq!(TransactionType::Confirmation.signed_quantity(5), None);
    }

    #[test]
    fn group_by_branch_groups_and_sorts() {
        let rows = vec![
            row("Kandy", "Laptop", 3),
            row("Colombo", "Router", 1),
            row("Kandy", "Monitor", 2),
        ];
        let grouped = group_by_branch(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].branch, "Colombo");
        assert_eq!(grouped[0].items.len(), 1);
        assert_eq!(grouped[1].branch, "Kandy");
        assert_eq!(grouped[1].items.len(), 2);
        assert_eq!(grouped[1].items[0].name, "Laptop");
    }

    #[test]
    fn group_by_branch_is_idempotent_for_fixed_input() {
        let rows = vec![
            row("B", "x", 1),
            row("A", "y", 2),
            row("B", "z", 3),
        ];
        let first = group_by_branch(rows.clone());
        let second = group_by_branch(rows);
        assert_eq!(first, second);
    }

    #[test]
    fn transaction_type_round_trips() {
        for t in [
            TransactionType::In,
            TransactionType::Out,
            TransactionType::Return,
            TransactionType::Transfer,
            TransactionType::Confirmation,
        ] {
            assert_eq!(TransactionType::parse(t.as_str()), Some(t));
        }
    }
}
