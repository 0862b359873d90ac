//! 配额快照查询处理器
//!
//! 原始快照在服务端解析成统一条目后返回

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::instrument;

use crate::infrastructure::database::quota_repository::QuotaFilter;
use crate::presentation::dto::QuotaView;
use crate::presentation::routes::AppState;
use crate::shared::{AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};

/// 配额列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuotasQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub auth_id: Option<i64>,
    pub auth_type: Option<String>,
}

/// 获取配额快照列表
#[instrument(skip(state))]
pub async fn list_quotas(
    State(state): State<AppState>,
    Query(query): Query<ListQuotasQuery>,
) -> AppResult<Json<PaginatedResponse<QuotaView>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let filter = QuotaFilter {
        auth_id: query.auth_id,
        auth_type: query.auth_type,
    };

    let (rows, total) = state
        .database
        .quotas
        .list(&filter, pagination.offset(), pagination.limit())
        .await?;

    let views = rows.into_iter().map(QuotaView::from_record).collect();

    Ok(Json(PaginatedResponse {
        data: views,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 获取指定凭据的最新配额快照
///
/// 凭据刚导入、数据面还没回写快照时返回null，前端轮询直到有值。
#[instrument(skip(state))]
pub async fn get_auth_file_quota(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Option<QuotaView>>> {
    state
        .database
        .auth_files
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("凭据不存在: {}", id)))?;

    let record = state.database.quotas.get_latest_by_auth_id(id).await?;

    Ok(Json(record.map(QuotaView::from_record)))
}

/// 获取单条配额快照
#[instrument(skip(state))]
pub async fn get_quota(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<QuotaView>> {
    let record = state
        .database
        .quotas
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("配额快照不存在: {}", id)))?;

    Ok(Json(QuotaView::from_record(record)))
}
