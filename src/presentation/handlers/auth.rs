//! 登录与会话处理器

use axum::{extract::State, response::Json, Extension};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::auth::{jwt::JwtService, password, AdminContext, AuthError};
use crate::presentation::routes::AppState;
use crate::shared::{AppError, AppResult};

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

/// 当前管理员信息
#[derive(Debug, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub username: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
}

/// 管理员登录
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    info!("🔐 管理员登录请求: {}", request.username);

    let admin = state
        .database
        .admins
        .get_by_username(&request.username)
        .await?
        .ok_or_else(|| {
            warn!("登录失败，用户名不存在: {}", request.username);
            AppError::Authentication(AuthError::InvalidCredentials)
        })?;

    if !admin.active {
        warn!("登录失败，账号已禁用: {}", request.username);
        return Err(AppError::Authentication(AuthError::AdminDisabled));
    }

    let password_valid = password::verify_password(&request.password, &admin.password_hash)
        .map_err(AppError::Authentication)?;
    if !password_valid {
        warn!("登录失败，密码错误: {}", request.username);
        return Err(AppError::Authentication(AuthError::InvalidCredentials));
    }

    let jwt_service = JwtService::new_with_expiry(
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    );
    let token = jwt_service
        .generate_token(admin.id, &admin.username, admin.is_super_admin)
        .map_err(AppError::Authentication)?;

    info!("✅ 管理员登录成功: {} (ID: {})", admin.username, admin.id);

    Ok(Json(LoginResponse {
        token,
        admin: AdminProfile {
            id: admin.id,
            username: admin.username,
            is_super_admin: admin.is_super_admin,
            permissions: admin.permissions,
        },
    }))
}

/// 获取当前登录管理员信息
#[instrument(skip(context))]
pub async fn profile(
    Extension(context): Extension<AdminContext>,
) -> AppResult<Json<AdminProfile>> {
    Ok(Json(AdminProfile {
        id: context.id,
        username: context.username,
        is_super_admin: context.is_super_admin,
        permissions: context.permissions,
    }))
}
