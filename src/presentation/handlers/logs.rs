//! 请求日志查询处理器

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::business::domain::RequestLog;
use crate::infrastructure::database::log_repository::LogFilter;
use crate::presentation::routes::AppState;
use crate::shared::{ApiResponse, AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};
use crate::validation_error;

/// 日志列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub auth_id: Option<i64>,
    pub provider: Option<String>,
    #[serde(default)]
    pub only_errors: bool,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

/// 日志清理请求
#[derive(Debug, Deserialize)]
pub struct PurgeLogsRequest {
    /// 保留最近N天，更早的删除
    pub keep_days: i64,
}

/// 获取请求日志列表
#[instrument(skip(state))]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> AppResult<Json<PaginatedResponse<RequestLog>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let filter = LogFilter {
        auth_id: query.auth_id,
        provider: query.provider,
        only_errors: query.only_errors,
        since: query.since,
        until: query.until,
    };

    let (rows, total) = state
        .database
        .logs
        .list(&filter, pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(PaginatedResponse {
        data: rows,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 清理历史日志
#[instrument(skip(state, request))]
pub async fn purge_logs(
    State(state): State<AppState>,
    Json(request): Json<PurgeLogsRequest>,
) -> AppResult<Json<ApiResponse<Value>>> {
    if request.keep_days < 1 {
        return Err(validation_error!("保留天数必须大于0"));
    }

    let cutoff = Utc::now() - Duration::days(request.keep_days);
    let purged = state.database.logs.purge_before(cutoff).await?;

    Ok(Json(ApiResponse::success(serde_json::json!({ "purged": purged }))))
}
