//! 凭据分组管理处理器

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::business::domain::AuthGroup;
use crate::infrastructure::database::auth_group_repository::AuthGroupDraft;
use crate::presentation::routes::AppState;
use crate::shared::utils::{coerce_non_negative_i32, validation};
use crate::shared::{ApiResponse, AppError, AppResult};
use crate::validation_error;

/// 创建/更新分组请求
#[derive(Debug, Deserialize)]
pub struct AuthGroupRequest {
    pub name: String,
    #[serde(default)]
    pub rate_limit: Value,
    #[serde(default)]
    pub user_group_ids: Vec<i64>,
}

impl AuthGroupRequest {
    fn into_draft(self) -> AppResult<AuthGroupDraft> {
        if !validation::is_valid_name(&self.name) {
            return Err(validation_error!("分组名称无效: {:?}", self.name));
        }

        Ok(AuthGroupDraft {
            name: self.name,
            rate_limit: coerce_non_negative_i32(&self.rate_limit),
            user_group_ids: self.user_group_ids,
        })
    }
}

/// 获取全部凭据分组
#[instrument(skip(state))]
pub async fn list_auth_groups(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AuthGroup>>> {
    let groups = state.database.auth_groups.list_all().await?;
    Ok(Json(groups))
}

/// 创建凭据分组
#[instrument(skip(state, request))]
pub async fn create_auth_group(
    State(state): State<AppState>,
    Json(request): Json<AuthGroupRequest>,
) -> AppResult<Json<AuthGroup>> {
    let draft = request.into_draft()?;
    let group = state.database.auth_groups.create(&draft).await?;

    Ok(Json(group))
}

/// 更新凭据分组
#[instrument(skip(state, request))]
pub async fn update_auth_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AuthGroupRequest>,
) -> AppResult<Json<AuthGroup>> {
    let draft = request.into_draft()?;
    let group = state
        .database
        .auth_groups
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("凭据分组不存在: {}", id)))?;

    Ok(Json(group))
}

/// 删除凭据分组
#[instrument(skip(state))]
pub async fn delete_auth_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let group = state
        .database
        .auth_groups
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("凭据分组不存在: {}", id)))?;

    if group.is_default {
        return Err(crate::business_error!("默认分组不能删除"));
    }

    state.database.auth_groups.delete(id).await?;

    info!("凭据分组已删除: {} (ID: {})", group.name, id);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

/// 设为默认分组
///
/// 同一时刻至多一个默认分组，由仓库层事务保证。
#[instrument(skip(state))]
pub async fn set_default_auth_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthGroup>> {
    let updated = state.database.auth_groups.set_default(id).await?;
    if !updated {
        return Err(AppError::NotFound(format!("凭据分组不存在: {}", id)));
    }

    let group = state
        .database
        .auth_groups
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::Internal("设置默认分组后读取失败".to_string()))?;

    Ok(Json(group))
}
