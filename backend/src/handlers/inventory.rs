//! HTTP handlers for inventory item endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::InvoiceExtractionClient;
use crate::middleware::CurrentUser;
use crate::services::inventory::{CreateItemInput, InventoryService, UpdateItemInput};
use crate::services::CategoryService;
use crate::AppState;
use shared::models::{ExtractedItem, InventoryItem};

/// List all inventory items
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Get a single inventory item
pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create inventory items. A comma-separated serial list fans out into one
/// item per serial, so the response is always a list.
pub async fn create_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.create_items(current_user.0.user_id, input).await?;
    Ok(Json(items))
}

/// Update an inventory item
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service
        .update_item(current_user.0.user_id, item_id, input)
        .await?;
    Ok(Json(item))
}

/// Delete an inventory item
pub async fn delete_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = InventoryService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(()))
}

/// Extract inventory items from an uploaded invoice (image or PDF). Returns
/// draft items for review; nothing is persisted here.
pub async fn extract_invoice(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<Vec<ExtractedItem>>> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut mime_type = "application/octet-stream".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: "file".to_string(),
            message: format!("Invalid multipart payload: {}", e),
        })?
    {
        if field.name() == Some("file") {
            if let Some(ct) = field.content_type() {
                mime_type = ct.to_string();
            }
            let bytes = field.bytes().await.map_err(|e| AppError::Validation {
                field: "file".to_string(),
                message: format!("Failed to read file: {}", e),
            })?;
            file_bytes = Some(bytes.to_vec());
        }
    }

    let file_bytes = file_bytes.ok_or(AppError::MissingFields)?;
    if file_bytes.is_empty() {
        return Err(AppError::Validation {
            field: "file".to_string(),
            message: "Uploaded file is empty".to_string(),
        });
    }

    let categories = CategoryService::new(state.db).names().await?;
    let client = InvoiceExtractionClient::new(&state.config.extraction);
    let items = client
        .extract_items(&file_bytes, &mime_type, &categories)
        .await?;
    Ok(Json(items))
}
