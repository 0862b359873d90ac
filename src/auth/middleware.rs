//! 认证中间件模块

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::{has_permission, jwt::JwtService, AuthError};
use crate::shared::AppError;

/// 当前登录管理员的请求上下文
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub id: i64,
    pub username: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
}

/// 管理员JWT认证中间件
///
/// 验证Bearer token、确认管理员仍然存在且启用，
/// 再按命中的路由模板做一次权限复查（界面开关之外的后端兜底）。
pub async fn admin_auth_middleware(
    State(app_state): State<crate::presentation::routes::AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let database = &app_state.database;

    // 从Authorization header中提取token
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| AppError::Authentication(AuthError::InvalidToken))?;

    // 验证JWT token
    let jwt_service = JwtService::new_with_expiry(
        &app_state.config.auth.jwt_secret,
        app_state.config.auth.token_expiry_hours,
    );
    let claims = jwt_service
        .verify_token(&token)
        .map_err(AppError::Authentication)?;

    let admin_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Authentication(AuthError::InvalidToken))?;

    // 每个请求都以库里的最新状态为准，不信任token里的快照
    let admin = database
        .admins
        .get_by_id(admin_id)
        .await?
        .ok_or_else(|| AppError::Authentication(AuthError::AdminNotFound))?;

    if !admin.active {
        return Err(AppError::Authentication(AuthError::AdminDisabled));
    }

    // 权限键用路由模板（保留 :id 占位符）而不是实际路径
    let method = request.method().as_str().to_string();
    let path_template = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if !has_permission(admin.is_super_admin, &admin.permissions, &method, &path_template) {
        return Err(AppError::Forbidden(format!(
            "缺少权限: {} {}",
            method, path_template
        )));
    }

    let context = AdminContext {
        id: admin.id,
        username: admin.username,
        is_super_admin: admin.is_super_admin,
        permissions: admin.permissions,
    };
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// 从Authorization header中提取Bearer token
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|auth_header| auth_header.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert("authorization", HeaderValue::from_static("Basic xyz"));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
