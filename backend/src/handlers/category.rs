//! HTTP handlers for category endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::category::{CategoryInput, CategoryService};
use crate::AppState;
use shared::models::Category;

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.create(input).await?;
    Ok(Json(category))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.update(category_id, input).await?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CategoryService::new(state.db);
    service.delete(category_id).await?;
    Ok(Json(()))
}
