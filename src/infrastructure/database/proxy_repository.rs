//! 代理节点数据库操作

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::business::domain::Proxy;
use crate::shared::AppResult;

/// 代理节点数据库服务
#[derive(Debug, Clone)]
pub struct ProxyRepository {
    pool: PgPool,
}

impl ProxyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 分页查询代理节点
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Proxy>, i64)> {
        let rows = sqlx::query_as::<_, Proxy>(
            "SELECT id, proxy_url, created_at, updated_at FROM proxies \
             ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM proxies")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 获取全部代理（批量轮询绑定用）
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> AppResult<Vec<Proxy>> {
        let rows = sqlx::query_as::<_, Proxy>(
            "SELECT id, proxy_url, created_at, updated_at FROM proxies ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 根据ID获取代理
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Proxy>> {
        let row = sqlx::query_as::<_, Proxy>(
            "SELECT id, proxy_url, created_at, updated_at FROM proxies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建代理
    #[instrument(skip(self))]
    pub async fn create(&self, proxy_url: &str) -> AppResult<Proxy> {
        let row = sqlx::query_as::<_, Proxy>(
            "INSERT INTO proxies (proxy_url) VALUES ($1) \
             RETURNING id, proxy_url, created_at, updated_at",
        )
        .bind(proxy_url)
        .fetch_one(&self.pool)
        .await?;

        info!("代理节点创建成功 (ID: {})", row.id);
        Ok(row)
    }

    /// 更新代理地址
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, proxy_url: &str) -> AppResult<Option<Proxy>> {
        let row = sqlx::query_as::<_, Proxy>(
            "UPDATE proxies SET proxy_url = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, proxy_url, created_at, updated_at",
        )
        .bind(id)
        .bind(proxy_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除代理
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM proxies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 代理总数（总览页用）
    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM proxies")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
