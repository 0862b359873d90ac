//! 管理员账号管理处理器

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::{password, AdminContext};
use crate::business::domain::Admin;
use crate::infrastructure::database::admin_repository::AdminDraft;
use crate::presentation::routes::AppState;
use crate::shared::utils::validation;
use crate::shared::{ApiResponse, AppError, AppResult};
use crate::{business_error, validation_error};

/// 创建管理员请求
///
/// 不提供密码时服务端生成随机初始密码并在响应中返回一次
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// 更新管理员请求
#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub username: String,
    pub is_super_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub active: bool,
}

/// 创建/重置密码响应
#[derive(Debug, Serialize)]
pub struct AdminWithPassword {
    #[serde(flatten)]
    pub admin: Admin,
    /// 只在创建/重置时返回一次
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_password: Option<String>,
}

/// 获取管理员列表
#[instrument(skip(state))]
pub async fn list_admins(State(state): State<AppState>) -> AppResult<Json<Vec<Admin>>> {
    let admins = state.database.admins.list_all().await?;
    Ok(Json(admins))
}

/// 创建管理员
#[instrument(skip(state, request))]
pub async fn create_admin(
    State(state): State<AppState>,
    Json(request): Json<CreateAdminRequest>,
) -> AppResult<Json<AdminWithPassword>> {
    if !validation::is_valid_username(&request.username) {
        return Err(validation_error!("用户名无效: {:?}", request.username));
    }

    let (plain_password, generated) = match request.password {
        Some(password) => {
            if !validation::is_strong_password(&password) {
                return Err(validation_error!("密码强度不足：至少8位且包含字母和数字"));
            }
            (password, None)
        }
        None => {
            let generated = password::generate_initial_password();
            (generated.clone(), Some(generated))
        }
    };

    let password_hash =
        password::hash_password(&plain_password).map_err(AppError::Authentication)?;

    let draft = AdminDraft {
        username: request.username,
        is_super_admin: request.is_super_admin,
        permissions: request.permissions,
        active: request.active,
    };
    let admin = state.database.admins.create(&draft, &password_hash).await?;

    Ok(Json(AdminWithPassword {
        admin,
        initial_password: generated,
    }))
}

/// 更新管理员
#[instrument(skip(state, request))]
pub async fn update_admin(
    State(state): State<AppState>,
    Extension(context): Extension<AdminContext>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAdminRequest>,
) -> AppResult<Json<Admin>> {
    if !validation::is_valid_username(&request.username) {
        return Err(validation_error!("用户名无效: {:?}", request.username));
    }

    let existing = state
        .database
        .admins
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("管理员不存在: {}", id)))?;

    // 最后一个可用超管不允许降级或禁用
    let losing_super = existing.is_super_admin
        && existing.active
        && (!request.is_super_admin || !request.active);
    if losing_super && state.database.admins.count_super_admins().await? <= 1 {
        return Err(business_error!("至少保留一个可用的超级管理员"));
    }

    let draft = AdminDraft {
        username: request.username,
        is_super_admin: request.is_super_admin,
        permissions: request.permissions,
        active: request.active,
    };
    let admin = state
        .database
        .admins
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("管理员不存在: {}", id)))?;

    info!("管理员已更新: {} (操作者: {})", admin.username, context.username);
    Ok(Json(admin))
}

/// 删除管理员
#[instrument(skip(state))]
pub async fn delete_admin(
    State(state): State<AppState>,
    Extension(context): Extension<AdminContext>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if id == context.id {
        return Err(business_error!("不能删除当前登录的管理员"));
    }

    let existing = state
        .database
        .admins
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("管理员不存在: {}", id)))?;

    if existing.is_super_admin
        && existing.active
        && state.database.admins.count_super_admins().await? <= 1
    {
        return Err(business_error!("至少保留一个可用的超级管理员"));
    }

    state.database.admins.delete(id).await?;

    info!("管理员已删除: {} (操作者: {})", existing.username, context.username);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

/// 重置管理员密码
///
/// 生成新的随机密码，明文只在本次响应中出现。
#[instrument(skip(state))]
pub async fn reset_admin_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AdminWithPassword>> {
    state
        .database
        .admins
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("管理员不存在: {}", id)))?;

    let new_password = password::generate_initial_password();
    let password_hash =
        password::hash_password(&new_password).map_err(AppError::Authentication)?;
    state.database.admins.set_password(id, &password_hash).await?;

    // 改完回读，响应里带的是落库后的状态
    let admin = state
        .database
        .admins
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("管理员不存在: {}", id)))?;

    Ok(Json(AdminWithPassword {
        admin,
        initial_password: Some(new_password),
    }))
}
