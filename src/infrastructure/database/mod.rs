//! 数据库模块
//!
//! 连接池管理和按实体划分的仓库

pub mod admin_repository;
pub mod auth_file_repository;
pub mod auth_group_repository;
pub mod billing_rule_repository;
pub mod log_repository;
pub mod plan_repository;
pub mod proxy_repository;
pub mod quota_repository;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::infrastructure::config::Config;

pub use admin_repository::AdminRepository;
pub use auth_file_repository::AuthFileRepository;
pub use auth_group_repository::AuthGroupRepository;
pub use billing_rule_repository::BillingRuleRepository;
pub use log_repository::LogRepository;
pub use plan_repository::PlanRepository;
pub use proxy_repository::ProxyRepository;
pub use quota_repository::QuotaRepository;

/// 数据库管理器 - 持有连接池并暴露各实体仓库
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    pub admins: AdminRepository,
    pub auth_files: AuthFileRepository,
    pub auth_groups: AuthGroupRepository,
    pub billing_rules: BillingRuleRepository,
    pub logs: LogRepository,
    pub plans: PlanRepository,
    pub proxies: ProxyRepository,
    pub quotas: QuotaRepository,
}

impl Database {
    /// 使用配置创建数据库实例
    pub async fn new(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
            .connect(&config.database_url)
            .await?;

        tracing::info!(
            "数据库连接池初始化成功 - max: {}, min: {}",
            config.database.max_connections,
            config.database.min_connections
        );

        Ok(Self::from_pool(pool))
    }

    /// 由现成的连接池组装（测试用）
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            admins: AdminRepository::new(pool.clone()),
            auth_files: AuthFileRepository::new(pool.clone()),
            auth_groups: AuthGroupRepository::new(pool.clone()),
            billing_rules: BillingRuleRepository::new(pool.clone()),
            logs: LogRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            proxies: ProxyRepository::new(pool.clone()),
            quotas: QuotaRepository::new(pool.clone()),
            pool,
        }
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 执行待应用的迁移
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}
