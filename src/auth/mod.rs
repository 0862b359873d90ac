//! 认证和授权模块
//!
//! 提供管理员JWT认证、权限开关和OAuth回调解析

pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod password;
pub mod permission;

// 重新导出常用类型
pub use jwt::Claims;
pub use middleware::AdminContext;
pub use permission::{has_permission, permission_key};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("无效的认证信息")]
    InvalidCredentials,
    #[error("管理员未找到")]
    AdminNotFound,
    #[error("账号已被禁用")]
    AdminDisabled,
    #[error("Token已过期")]
    TokenExpired,
    #[error("无效的Token")]
    InvalidToken,
    #[error("认证失败: {0}")]
    AuthenticationFailed(String),
}
