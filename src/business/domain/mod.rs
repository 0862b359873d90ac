//! 领域模型模块
//!
//! 定义业务领域的核心实体和值对象

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::shared::types::{AdminId, AuthFileId, AuthGroupId, ProxyId};

pub mod normalize;
pub mod proxy_url;
pub mod support_models;

pub use normalize::{group_ids_equal, normalize_group_ids};
pub use proxy_url::{assemble_proxy_url, parse_proxy_url, ProxyEndpoint};
pub use support_models::{clean_support_models, SupportModel};

/// 凭据文件领域模型
///
/// 网关数据面用来对上游认证的一份凭据（token/cookie），
/// 管理端负责其生命周期和分组归属。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthFile {
    pub id: AuthFileId,
    pub key: String,
    pub auth_type: String,
    pub auth_group_ids: Vec<AuthGroupId>,
    pub proxy_url: Option<String>,
    pub priority: i32,
    pub rate_limit: i32,
    pub is_available: bool,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 凭据分组领域模型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthGroup {
    pub id: AuthGroupId,
    pub name: String,
    pub is_default: bool,
    pub rate_limit: i32,
    pub user_group_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 出口代理领域模型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Proxy {
    pub id: ProxyId,
    pub proxy_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 订阅套餐领域模型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub month_price: f64,
    pub support_models: serde_json::Value,
    pub quotas: serde_json::Value,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 计费方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum BillingType {
    /// 按次计费
    PerRequest,
    /// 按token计费
    PerToken,
}

impl TryFrom<i16> for BillingType {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BillingType::PerRequest),
            2 => Ok(BillingType::PerToken),
            _ => Err(format!("无效的计费方式: {}", value)),
        }
    }
}

impl From<BillingType> for i16 {
    fn from(value: BillingType) -> Self {
        match value {
            BillingType::PerRequest => 1,
            BillingType::PerToken => 2,
        }
    }
}

/// 计费规则领域模型
///
/// 按 (凭据分组, 用户分组, 提供商, 模型) 四元组限定一条价格。
/// `billing_type` 决定互斥的价格字段集合。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BillingRule {
    pub id: i64,
    pub auth_group_id: AuthGroupId,
    pub user_group_id: i64,
    pub provider: String,
    pub model: String,
    pub billing_type: i16,
    pub price_per_request: Option<f64>,
    pub input_token_price: Option<f64>,
    pub output_token_price: Option<f64>,
    pub cache_read_token_price: Option<f64>,
    pub cache_write_token_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 配额快照领域模型
///
/// `data` 是提供商特有的不透明JSON，由配额解析器按 `auth_type` 解读。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuotaRecord {
    pub id: i64,
    pub auth_id: AuthFileId,
    pub auth_type: String,
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// 管理员领域模型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 请求日志领域模型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestLog {
    pub id: i64,
    pub auth_id: Option<AuthFileId>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub status_code: i32,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
