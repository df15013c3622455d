//! Stock movement service: the append-only ledger and its side effects on
//! inventory items, plus the read-side branch aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{ItemRow, ITEM_COLUMNS};
use shared::models::{
    group_by_branch, plan_movement, validate_movement, BranchTransfers, InventoryItem,
    MovementError, Transaction, TransactionType, TransferredItem,
};
use shared::types::StockStatus;
use shared::validation::split_serial_numbers;

/// Reason prefix marking a transfer as a pending replacement
const REPLACEMENT_REASON_PREFIX: &str = "Replacement Equipment";

/// Location given to items reconstructed from the ledger on an orphan return
const MAIN_INVENTORY_LOCATION: &str = "Main Inventory";

/// Transaction service for recording stock movements
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// Input for POST /transactions (in, out and return movements)
#[derive(Debug, Deserialize)]
pub struct CreateTransactionInput {
    pub item_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub quantity: Option<i32>,
    pub branch: Option<String>,
    pub item_tracking_id: Option<String>,
}

/// Input for POST /transactions/transfer
#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub item_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub branch: Option<String>,
    pub asset_number: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub item_tracking_id: Option<String>,
    pub reason: Option<String>,
}

/// A validated stock movement, ready to apply
struct Movement {
    item_id: Uuid,
    transaction_type: TransactionType,
    quantity: i32,
    branch: Option<String>,
    asset_number: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
    item_tracking_id: Option<String>,
    reason: Option<String>,
}

/// Result of applying a movement
#[derive(Debug, Serialize)]
pub struct MovementOutcome {
    pub transaction: Transaction,
    /// Final state of the item; the pre-deletion state when `item_deleted`
    pub item: InventoryItem,
    pub item_deleted: bool,
}

/// Database row for a ledger entry
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: Uuid,
    item_id: Uuid,
    item_name: Option<String>,
    item_category: Option<String>,
    transaction_type: String,
    quantity: i32,
    branch: Option<String>,
    asset_number: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
    item_tracking_id: Option<String>,
    reason: Option<String>,
    performed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::parse(&r.transaction_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown transaction type: {}", r.transaction_type))
        })?;
        Ok(Transaction {
            id: r.id,
            item_id: r.item_id,
            item_name: r.item_name,
            item_category: r.item_category,
            transaction_type,
            quantity: r.quantity,
            branch: r.branch,
            asset_number: r.asset_number,
            model: r.model,
            serial_number: r.serial_number,
            item_tracking_id: r.item_tracking_id,
            reason: r.reason,
            performed_by: r.performed_by,
            created_at: r.created_at,
        })
    }
}

/// Map a movement planning error to the API error taxonomy. Insufficient
/// stock is handled at the call site where the item is available for the
/// message.
fn map_movement_error(e: MovementError) -> AppError {
    match e {
        MovementError::NonPositiveQuantity => AppError::Validation {
            field: "quantity".to_string(),
            message: "Quantity must be positive".to_string(),
        },
        MovementError::BranchMissing => AppError::BranchRequired,
        MovementError::TrackingIdMissing => AppError::TrackingIdRequired,
        MovementError::QuantityOverflow => AppError::Validation {
            field: "quantity".to_string(),
            message: "Quantity is too large".to_string(),
        },
        MovementError::InsufficientStock => {
            AppError::InsufficientStock("Insufficient stock".to_string())
        }
    }
}

/// Column list for ledger queries
const TRANSACTION_COLUMNS: &str = "id, item_id, item_name, item_category, \
     transaction_type, quantity, branch, asset_number, model, serial_number, \
     item_tracking_id, reason, performed_by, created_at";

/// Row for the branch aggregation query
#[derive(Debug, FromRow)]
struct TransferredItemRow {
    branch: String,
    item_id: Uuid,
    item_tracking_id: Option<String>,
    net_quantity: i64,
    last_movement_at: DateTime<Utc>,
    name: String,
    category: String,
    asset_number: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
    reason: Option<String>,
}

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an in, out or return movement
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateTransactionInput,
    ) -> AppResult<MovementOutcome> {
        let item_id = input.item_id.ok_or(AppError::MissingFields)?;
        let transaction_type = input.transaction_type.ok_or(AppError::MissingFields)?;
        let quantity = input.quantity.ok_or(AppError::MissingFields)?;

        match transaction_type {
            TransactionType::In | TransactionType::Out | TransactionType::Return => {}
            TransactionType::Transfer => {
                return Err(AppError::Validation {
                    field: "type".to_string(),
                    message: "Use the transfer endpoint for transfer transactions".to_string(),
                });
            }
            TransactionType::Confirmation => {
                return Err(AppError::Validation {
                    field: "type".to_string(),
                    message: "Confirmation entries are created via the pending replacements \
                              endpoint"
                        .to_string(),
                });
            }
        }

        self.apply_movement(
            user_id,
            Movement {
                item_id,
                transaction_type,
                quantity,
                branch: input.branch,
                asset_number: None,
                model: None,
                serial_number: None,
                item_tracking_id: input.item_tracking_id,
                reason: None,
            },
        )
        .await
    }

    /// Record a transfer to a branch
    pub async fn transfer(
        &self,
        user_id: Uuid,
        input: TransferInput,
    ) -> AppResult<MovementOutcome> {
        let item_id = input.item_id.ok_or(AppError::MissingFields)?;
        let quantity = input.quantity.ok_or(AppError::MissingFields)?;

        self.apply_movement(
            user_id,
            Movement {
                item_id,
                transaction_type: TransactionType::Transfer,
                quantity,
                branch: input.branch,
                asset_number: input.asset_number,
                model: input.model,
                serial_number: input.serial_number,
                item_tracking_id: input.item_tracking_id,
                reason: input.reason,
            },
        )
        .await
    }

    /// Apply a stock movement: validate, mutate the item, append the ledger
    /// entry. Both writes happen in one database transaction, with the item
    /// row locked so concurrent movements against the same item serialize.
    async fn apply_movement(
        &self,
        user_id: Uuid,
        movement: Movement,
    ) -> AppResult<MovementOutcome> {
        validate_movement(
            movement.transaction_type,
            movement.quantity,
            movement.branch.as_deref(),
            movement.item_tracking_id.as_deref(),
        )
        .map_err(map_movement_error)?;

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(movement.item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let item = match existing {
            Some(row) => row,
            None if movement.transaction_type == TransactionType::Return => {
                self.reconstruct_from_transfer(&mut tx, &movement, user_id)
                    .await?
            }
            None => return Err(AppError::NotFound("Inventory item".to_string())),
        };

        let plan = match plan_movement(
            movement.transaction_type,
            movement.quantity,
            item.quantity,
            item.min_stock,
        ) {
            Ok(plan) => plan,
            Err(MovementError::InsufficientStock) => {
                return Err(AppError::InsufficientStock(format!(
                    "Requested {} but only {} of {} in stock",
                    movement.quantity, item.quantity, item.name
                )));
            }
            Err(e) => return Err(map_movement_error(e)),
        };
        let new_quantity = plan.new_quantity;
        let new_status = plan.new_status;
        let item_deleted = plan.delete_item;

        let final_item: InventoryItem = if item_deleted {
            // Branch depletion is modelled as item removal; the ledger
            // snapshot keeps the name/category retrievable.
            sqlx::query("DELETE FROM inventory_items WHERE id = $1")
                .bind(item.id)
                .execute(&mut *tx)
                .await?;

            let mut gone: InventoryItem = item.into();
            gone.quantity = new_quantity;
            gone.status = new_status;
            gone
        } else {
            let row = sqlx::query_as::<_, ItemRow>(&format!(
                r#"
                UPDATE inventory_items
                SET quantity = $1, status = $2, updated_by = $3, updated_at = NOW()
                WHERE id = $4
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(new_quantity)
            .bind(new_status.as_str())
            .bind(user_id)
            .bind(item.id)
            .fetch_one(&mut *tx)
            .await?;
            row.into()
        };

        let ledger_row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (
                item_id, item_name, item_category, transaction_type, quantity, branch,
                asset_number, model, serial_number, item_tracking_id, reason, performed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(final_item.id)
        .bind(&final_item.name)
        .bind(&final_item.category)
        .bind(movement.transaction_type.as_str())
        .bind(movement.quantity)
        .bind(&movement.branch)
        .bind(&movement.asset_number)
        .bind(&movement.model)
        .bind(&movement.serial_number)
        .bind(&movement.item_tracking_id)
        .bind(&movement.reason)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            item = %final_item.name,
            movement = movement.transaction_type.as_str(),
            quantity = movement.quantity,
            item_deleted,
            "Applied stock movement"
        );

        Ok(MovementOutcome {
            transaction: ledger_row.try_into()?,
            item: final_item,
            item_deleted,
        })
    }

    /// Rebuild a minimal item from the most recent matching transfer so an
    /// orphan return has something to apply against.
    async fn reconstruct_from_transfer(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        movement: &Movement,
        user_id: Uuid,
    ) -> AppResult<ItemRow> {
        let origin = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE item_id = $1 AND transaction_type = 'transfer'
              AND ($2::text IS NULL OR item_tracking_id = $2)
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(movement.item_id)
        .bind(&movement.item_tracking_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::OriginalTransferNotFound)?;

        let name = origin.item_name.unwrap_or_else(|| "Unknown item".to_string());
        let category = origin.item_category.unwrap_or_default();

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO inventory_items (
                id, name, category, quantity, min_stock, model, serial_number,
                location, status, created_by, updated_by
            )
            VALUES ($1, $2, $3, 0, 0, $4, $5, $6, $7, $8, $8)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(movement.item_id)
        .bind(&name)
        .bind(&category)
        .bind(&origin.model)
        .bind(&origin.serial_number)
        .bind(MAIN_INVENTORY_LOCATION)
        .bind(StockStatus::OutOfStock.as_str())
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        // Re-claim the serials recorded on the transfer. The drain deletion
        // released them, and another item may have taken one since, so a
        // conflict here skips the serial rather than failing the return.
        if let Some(serial_csv) = &row.serial_number {
            for serial in split_serial_numbers(serial_csv) {
                sqlx::query(
                    "INSERT INTO item_serials (serial, item_id) VALUES ($1, $2) \
                     ON CONFLICT (serial) DO NOTHING",
                )
                .bind(&serial)
                .bind(row.id)
                .execute(&mut **tx)
                .await?;
            }
        }

        tracing::info!(item = %name, "Reconstructed item from transfer ledger for return");
        Ok(row)
    }

    /// Ledger entries for one item, newest first
    pub async fn transactions_for_item(&self, item_id: Uuid) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE item_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Current net stock per branch: transfers in, minus returns, grouped by
    /// (branch, item, tracking id), carrying the latest movement's metadata
    /// and preferring the live item's name/category when it still exists.
    pub async fn transferred_items_by_branch(&self) -> AppResult<Vec<BranchTransfers>> {
        let rows = sqlx::query_as::<_, TransferredItemRow>(
            r#"
            WITH movements AS (
                SELECT branch, item_id, item_tracking_id,
                       SUM(CASE WHEN transaction_type = 'transfer'
                                THEN quantity ELSE -quantity END)::bigint AS net_quantity,
                       MAX(created_at) AS last_movement_at
                FROM transactions
                WHERE transaction_type IN ('transfer', 'return') AND branch IS NOT NULL
                GROUP BY branch, item_id, item_tracking_id
                HAVING SUM(CASE WHEN transaction_type = 'transfer'
                                THEN quantity ELSE -quantity END) > 0
            )
            SELECT m.branch, m.item_id, m.item_tracking_id, m.net_quantity,
                   m.last_movement_at,
                   COALESCE(i.name, latest.item_name, '') AS name,
                   COALESCE(i.category, latest.item_category, '') AS category,
                   latest.asset_number, latest.model, latest.serial_number, latest.reason
            FROM movements m
            JOIN LATERAL (
                SELECT item_name, item_category, asset_number, model, serial_number, reason
                FROM transactions
                WHERE branch = m.branch AND item_id = m.item_id
                  AND item_tracking_id IS NOT DISTINCT FROM m.item_tracking_id
                  AND transaction_type IN ('transfer', 'return')
                ORDER BY created_at DESC
                LIMIT 1
            ) latest ON TRUE
            LEFT JOIN inventory_items i ON i.id = m.item_id
            ORDER BY m.branch, m.last_movement_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let flat: Vec<TransferredItem> = rows
            .into_iter()
            .map(|r| TransferredItem {
                item_id: r.item_id,
                branch: r.branch,
                item_tracking_id: r.item_tracking_id,
                name: r.name,
                category: r.category,
                net_quantity: r.net_quantity,
                asset_number: r.asset_number,
                model: r.model,
                serial_number: r.serial_number,
                reason: r.reason,
                last_movement_at: r.last_movement_at,
            })
            .collect();

        Ok(group_by_branch(flat))
    }

    /// Distinct branch names seen in out-type history (legacy view)
    pub async fn branches(&self) -> AppResult<Vec<String>> {
        let branches = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT branch FROM transactions
            WHERE transaction_type = 'out' AND branch IS NOT NULL
            ORDER BY branch
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(branches)
    }

    /// Full ledger, newest first (superadmin audit view)
    pub async fn audit_logs(&self) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Remove one ledger entry (superadmin only; the sole mutation the
    /// append-only ledger allows)
    pub async fn delete_audit_log(&self, transaction_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction".to_string()));
        }

        Ok(())
    }

    /// Replacement transfers that have not been confirmed yet
    pub async fn pending_replacements(&self) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions t
            WHERE t.transaction_type = 'transfer'
              AND t.reason LIKE $1
              AND NOT EXISTS (
                  SELECT 1 FROM transactions c
                  WHERE c.transaction_type = 'confirmation'
                    AND c.branch IS NOT DISTINCT FROM t.branch
                    AND c.item_tracking_id IS NOT DISTINCT FROM t.item_tracking_id
                    AND c.created_at > t.created_at
              )
            ORDER BY t.created_at DESC
            "#
        ))
        .bind(format!("{}%", REPLACEMENT_REASON_PREFIX))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Confirm a pending replacement transfer by appending a confirmation
    /// ledger entry snapshotting its branch and tracking id
    pub async fn confirm_replacement(
        &self,
        user_id: Uuid,
        transfer_id: Uuid,
    ) -> AppResult<Transaction> {
        let origin = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE id = $1 AND transaction_type = 'transfer' AND reason LIKE $2
            "#
        ))
        .bind(transfer_id)
        .bind(format!("{}%", REPLACEMENT_REASON_PREFIX))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Pending replacement".to_string()))?;

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (
                item_id, item_name, item_category, transaction_type, quantity, branch,
                item_tracking_id, reason, performed_by
            )
            VALUES ($1, $2, $3, 'confirmation', $4, $5, $6, $7, $8)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(origin.item_id)
        .bind(&origin.item_name)
        .bind(&origin.item_category)
        .bind(origin.quantity)
        .bind(&origin.branch)
        .bind(&origin.item_tracking_id)
        .bind(&origin.reason)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }
}
