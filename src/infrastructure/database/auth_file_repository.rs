//! 凭据文件数据库操作
//!
//! 实现凭据文件的CRUD和批量写操作

use sqlx::{PgPool, QueryBuilder};
use tracing::{info, instrument};

use crate::business::domain::{normalize_group_ids, AuthFile};
use crate::shared::AppResult;

/// 凭据文件列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct AuthFileFilter {
    pub auth_group_id: Option<i64>,
    pub auth_type: Option<String>,
    pub is_available: Option<bool>,
    pub keyword: Option<String>,
}

/// 新建/更新凭据文件的字段集合
#[derive(Debug, Clone)]
pub struct AuthFileDraft {
    pub key: String,
    pub auth_type: String,
    pub auth_group_ids: Vec<i64>,
    pub proxy_url: Option<String>,
    pub priority: i32,
    pub rate_limit: i32,
    pub is_available: bool,
    pub content: serde_json::Value,
}

/// 凭据文件数据库服务
#[derive(Debug, Clone)]
pub struct AuthFileRepository {
    pool: PgPool,
}

impl AuthFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按过滤条件分页查询凭据文件
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &AuthFileFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AuthFile>, i64)> {
        let mut query = QueryBuilder::new(
            "SELECT id, key, auth_type, auth_group_ids, proxy_url, priority, rate_limit, \
             is_available, content, created_at, updated_at FROM auth_files WHERE 1=1",
        );
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM auth_files WHERE 1=1");

        for builder in [&mut query, &mut count_query] {
            if let Some(group_id) = filter.auth_group_id {
                builder.push(" AND ").push_bind(group_id).push(" = ANY(auth_group_ids)");
            }
            if let Some(ref auth_type) = filter.auth_type {
                builder.push(" AND auth_type = ").push_bind(auth_type.clone());
            }
            if let Some(is_available) = filter.is_available {
                builder.push(" AND is_available = ").push_bind(is_available);
            }
            if let Some(ref keyword) = filter.keyword {
                builder
                    .push(" AND key ILIKE ")
                    .push_bind(format!("%{}%", keyword));
            }
        }

        query.push(" ORDER BY priority DESC, id ASC");
        query.push(" LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let rows = query.build_query_as::<AuthFile>().fetch_all(&self.pool).await?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 根据ID获取凭据文件
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<AuthFile>> {
        let row = sqlx::query_as::<_, AuthFile>(
            "SELECT id, key, auth_type, auth_group_ids, proxy_url, priority, rate_limit, \
             is_available, content, created_at, updated_at FROM auth_files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建凭据文件（分组ID写库前先规整）
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &AuthFileDraft) -> AppResult<AuthFile> {
        let group_ids = normalize_group_ids(&draft.auth_group_ids);

        let row = sqlx::query_as::<_, AuthFile>(
            "INSERT INTO auth_files \
             (key, auth_type, auth_group_ids, proxy_url, priority, rate_limit, is_available, content) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, key, auth_type, auth_group_ids, proxy_url, priority, rate_limit, \
             is_available, content, created_at, updated_at",
        )
        .bind(&draft.key)
        .bind(&draft.auth_type)
        .bind(&group_ids)
        .bind(&draft.proxy_url)
        .bind(draft.priority)
        .bind(draft.rate_limit)
        .bind(draft.is_available)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        info!("凭据文件创建成功: {} (ID: {})", row.key, row.id);
        Ok(row)
    }

    /// 更新凭据文件
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &AuthFileDraft) -> AppResult<Option<AuthFile>> {
        let group_ids = normalize_group_ids(&draft.auth_group_ids);

        let row = sqlx::query_as::<_, AuthFile>(
            "UPDATE auth_files SET key = $2, auth_type = $3, auth_group_ids = $4, proxy_url = $5, \
             priority = $6, rate_limit = $7, is_available = $8, content = $9, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, key, auth_type, auth_group_ids, proxy_url, priority, rate_limit, \
             is_available, content, created_at, updated_at",
        )
        .bind(id)
        .bind(&draft.key)
        .bind(&draft.auth_type)
        .bind(&group_ids)
        .bind(&draft.proxy_url)
        .bind(draft.priority)
        .bind(draft.rate_limit)
        .bind(draft.is_available)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除凭据文件
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM auth_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 只更新代理绑定（批量轮询绑定用）
    #[instrument(skip(self))]
    pub async fn set_proxy(&self, id: i64, proxy_url: Option<&str>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE auth_files SET proxy_url = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(proxy_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 只更新分组归属（批量设置分组用）
    #[instrument(skip(self))]
    pub async fn set_groups(&self, id: i64, group_ids: &[i64]) -> AppResult<bool> {
        let group_ids = normalize_group_ids(group_ids);

        let result = sqlx::query(
            "UPDATE auth_files SET auth_group_ids = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&group_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 统计总数和可用数（总览页用）
    #[instrument(skip(self))]
    pub async fn count_overview(&self) -> AppResult<(i64, i64)> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_available) FROM auth_files",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
