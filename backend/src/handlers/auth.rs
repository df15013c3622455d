//! HTTP handlers for authentication and account management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{
    AuthResponse, AuthService, CreateSubAdminInput, LoginInput, RegisterInput,
};
use crate::AppState;
use shared::models::User;

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db, &state.config);
    let response = service.register(input).await?;
    Ok(Json(response))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db, &state.config);
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// Get the current user's profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state.db, &state.config);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// List sub-admin accounts (superadmin only)
pub async fn list_subadmins(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.0.require_superadmin()?;
    let service = AuthService::new(state.db, &state.config);
    let users = service.list_subadmins().await?;
    Ok(Json(users))
}

/// Create a sub-admin account (superadmin only)
pub async fn create_subadmin(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSubAdminInput>,
) -> AppResult<Json<User>> {
    current_user.0.require_superadmin()?;
    let service = AuthService::new(state.db, &state.config);
    let user = service.create_subadmin(input).await?;
    Ok(Json(user))
}

/// Delete a sub-admin account (superadmin only)
pub async fn delete_subadmin(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_superadmin()?;
    let service = AuthService::new(state.db, &state.config);
    service.delete_subadmin(user_id).await?;
    Ok(Json(()))
}
