//! HTTP handlers for stock movement endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::transaction::{
    CreateTransactionInput, MovementOutcome, TransactionService, TransferInput,
};
use crate::AppState;
use shared::models::{BranchTransfers, Transaction};

/// Record an in, out or return movement
pub async fn create_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTransactionInput>,
) -> AppResult<Json<MovementOutcome>> {
    let service = TransactionService::new(state.db);
    let outcome = service.create(current_user.0.user_id, input).await?;
    Ok(Json(outcome))
}

/// Record a transfer to a branch
pub async fn create_transfer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferInput>,
) -> AppResult<Json<MovementOutcome>> {
    let service = TransactionService::new(state.db);
    let outcome = service.transfer(current_user.0.user_id, input).await?;
    Ok(Json(outcome))
}

/// Ledger entries for one item, newest first
pub async fn get_item_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<Transaction>>> {
    let service = TransactionService::new(state.db);
    let transactions = service.transactions_for_item(item_id).await?;
    Ok(Json(transactions))
}

/// Net transferred stock grouped by branch
pub async fn get_transferred_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<BranchTransfers>>> {
    let service = TransactionService::new(state.db);
    let branches = service.transferred_items_by_branch().await?;
    Ok(Json(branches))
}

/// Distinct branch names from out-type history
pub async fn get_branches(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    let service = TransactionService::new(state.db);
    let branches = service.branches().await?;
    Ok(Json(branches))
}

/// Full ledger, newest first (superadmin only)
pub async fn get_audit_logs(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Transaction>>> {
    current_user.0.require_superadmin()?;
    let service = TransactionService::new(state.db);
    let logs = service.audit_logs().await?;
    Ok(Json(logs))
}

/// Delete one ledger entry (superadmin only)
pub async fn delete_audit_log(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_superadmin()?;
    let service = TransactionService::new(state.db);
    service.delete_audit_log(transaction_id).await?;
    Ok(Json(()))
}

/// Replacement transfers awaiting confirmation
pub async fn get_pending_replacements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Transaction>>> {
    let service = TransactionService::new(state.db);
    let pending = service.pending_replacements().await?;
    Ok(Json(pending))
}

/// Confirm a pending replacement transfer
pub async fn confirm_replacement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transfer_id): Path<Uuid>,
) -> AppResult<Json<Transaction>> {
    let service = TransactionService::new(state.db);
    let confirmation = service
        .confirm_replacement(current_user.0.user_id, transfer_id)
        .await?;
    Ok(Json(confirmation))
}
