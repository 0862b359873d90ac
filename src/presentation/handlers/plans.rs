//! 订阅套餐管理处理器

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::business::domain::{clean_support_models, Plan};
use crate::infrastructure::database::plan_repository::PlanDraft;
use crate::presentation::routes::AppState;
use crate::shared::utils::{coerce_number_or_zero, validation};
use crate::shared::{ApiResponse, AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};
use crate::validation_error;

/// 套餐列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 创建/更新套餐请求
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    #[serde(default)]
    pub month_price: Value,
    #[serde(default)]
    pub support_models: Value,
    #[serde(default)]
    pub quotas: Value,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// 切换启用状态请求
#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    pub is_enabled: bool,
}

impl PlanRequest {
    fn into_draft(self) -> AppResult<PlanDraft> {
        if !validation::is_valid_name(&self.name) {
            return Err(validation_error!("套餐名称无效: {:?}", self.name));
        }

        // 任何一种存储编码都先规整成 [{provider, name}] 再落库
        let support_models = clean_support_models(&self.support_models);
        let support_models = serde_json::to_value(support_models)
            .map_err(|e| AppError::Internal(format!("序列化支持模型失败: {}", e)))?;

        let quotas = if self.quotas.is_null() {
            Value::Array(Vec::new())
        } else {
            self.quotas
        };

        Ok(PlanDraft {
            name: self.name,
            month_price: coerce_number_or_zero(&self.month_price),
            support_models,
            quotas,
            is_enabled: self.is_enabled,
        })
    }
}

/// 获取套餐列表
#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<ListPlansQuery>,
) -> AppResult<Json<PaginatedResponse<Plan>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let (rows, total) = state
        .database
        .plans
        .list(pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(PaginatedResponse {
        data: rows,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 获取单个套餐
#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Plan>> {
    let plan = state
        .database
        .plans
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("套餐不存在: {}", id)))?;

    Ok(Json(plan))
}

/// 创建套餐
#[instrument(skip(state, request))]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> AppResult<Json<Plan>> {
    let draft = request.into_draft()?;
    let plan = state.database.plans.create(&draft).await?;

    Ok(Json(plan))
}

/// 更新套餐
#[instrument(skip(state, request))]
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<PlanRequest>,
) -> AppResult<Json<Plan>> {
    let draft = request.into_draft()?;
    let plan = state
        .database
        .plans
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("套餐不存在: {}", id)))?;

    Ok(Json(plan))
}

/// 删除套餐
#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = state.database.plans.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("套餐不存在: {}", id)));
    }

    info!("套餐已删除 (ID: {})", id);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

/// 切换套餐启用状态
#[instrument(skip(state, request))]
pub async fn set_plan_enabled(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetEnabledRequest>,
) -> AppResult<Json<Plan>> {
    let updated = state.database.plans.set_enabled(id, request.is_enabled).await?;
    if !updated {
        return Err(AppError::NotFound(format!("套餐不存在: {}", id)));
    }

    let plan = state
        .database
        .plans
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::Internal("更新后读取套餐失败".to_string()))?;

    Ok(Json(plan))
}
