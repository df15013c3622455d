//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{DashboardStats, ReportingService, SpendingReport};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    pub year: Option<i32>,
}

/// Dashboard stock counters
pub async fn get_stats(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardStats>> {
    let service = ReportingService::new(state.db);
    let stats = service.dashboard_stats().await?;
    Ok(Json(stats))
}

/// Spending report for a year, defaulting to the current year
pub async fn get_spending(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SpendingQuery>,
) -> AppResult<Json<SpendingReport>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let service = ReportingService::new(state.db);
    let report = service.spending(year).await?;
    Ok(Json(report))
}
