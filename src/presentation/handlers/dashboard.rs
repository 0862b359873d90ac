//! 总览页处理器

use axum::{extract::State, response::Json};
use serde::Serialize;
use tracing::instrument;

use crate::presentation::routes::AppState;
use crate::shared::AppResult;

/// 总览统计
#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub auth_file_total: i64,
    pub auth_file_available: i64,
    pub auth_group_total: i64,
    pub proxy_total: i64,
    pub requests_24h: i64,
    pub errors_24h: i64,
}

/// 获取总览统计
#[instrument(skip(state))]
pub async fn overview(State(state): State<AppState>) -> AppResult<Json<DashboardOverview>> {
    let (auth_file_total, auth_file_available) =
        state.database.auth_files.count_overview().await?;
    let auth_group_total = state.database.auth_groups.count().await?;
    let proxy_total = state.database.proxies.count().await?;
    let (requests_24h, errors_24h) = state.database.logs.count_recent().await?;

    Ok(Json(DashboardOverview {
        auth_file_total,
        auth_file_available,
        auth_group_total,
        proxy_total,
        requests_24h,
        errors_24h,
    }))
}
