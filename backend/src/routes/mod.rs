//! Route definitions for the Warehouse Inventory Management Platform

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes. The state is threaded into the auth middleware so
/// token verification uses the configured JWT secret.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (register/login public, the rest protected)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - inventory items
        .nest("/inventory", inventory_routes(state.clone()))
        // Protected routes - categories
        .nest("/categories", category_routes(state.clone()))
        // Protected routes - stock movements
        .nest("/transactions", transaction_routes(state.clone()))
        // Protected routes - reporting
        .nest("/reports", reporting_routes(state))
}

/// Authentication and account routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected_auth_routes(state))
}

fn protected_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route(
            "/subadmins",
            get(handlers::list_subadmins).post(handlers::create_subadmin),
        )
        .route("/subadmins/:user_id", delete(handlers::delete_subadmin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory item routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_items))
        .route("/upload-invoice", post(handlers::extract_invoice))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Category routes (protected)
fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            axum::routing::put(handlers::update_category).delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock movement routes (protected). Static paths come before the
/// parameterized audit-log route.
fn transaction_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_transaction))
        .route("/transfer", post(handlers::create_transfer))
        .route("/transferred-items", get(handlers::get_transferred_items))
        .route("/branches", get(handlers::get_branches))
        .route("/audit-logs", get(handlers::get_audit_logs))
        .route(
            "/audit-logs/:transaction_id",
            delete(handlers::delete_audit_log),
        )
        .route(
            "/pending-replacements",
            get(handlers::get_pending_replacements),
        )
        .route(
            "/pending-replacements/:transfer_id/confirm",
            post(handlers::confirm_replacement),
        )
        .route("/:item_id", get(handlers::get_item_transactions))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::get_stats))
        .route("/spending", get(handlers::get_spending))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
