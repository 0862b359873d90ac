//! 凭据分组数据库操作

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::business::domain::{normalize_group_ids, AuthGroup};
use crate::shared::AppResult;

const GROUP_COLUMNS: &str = "id, name, is_default, rate_limit, user_group_ids, created_at, updated_at";

/// 凭据分组字段集合
#[derive(Debug, Clone)]
pub struct AuthGroupDraft {
    pub name: String,
    pub rate_limit: i32,
    pub user_group_ids: Vec<i64>,
}

/// 凭据分组数据库服务
#[derive(Debug, Clone)]
pub struct AuthGroupRepository {
    pool: PgPool,
}

impl AuthGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取全部分组（分组数量有限，不分页）
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> AppResult<Vec<AuthGroup>> {
        let rows = sqlx::query_as::<_, AuthGroup>(&format!(
            "SELECT {} FROM auth_groups ORDER BY id ASC",
            GROUP_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 根据ID获取分组
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<AuthGroup>> {
        let row = sqlx::query_as::<_, AuthGroup>(&format!(
            "SELECT {} FROM auth_groups WHERE id = $1",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建分组
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &AuthGroupDraft) -> AppResult<AuthGroup> {
        let user_group_ids = normalize_group_ids(&draft.user_group_ids);

        let row = sqlx::query_as::<_, AuthGroup>(&format!(
            "INSERT INTO auth_groups (name, rate_limit, user_group_ids) \
             VALUES ($1, $2, $3) RETURNING {}",
            GROUP_COLUMNS
        ))
        .bind(&draft.name)
        .bind(draft.rate_limit)
        .bind(&user_group_ids)
        .fetch_one(&self.pool)
        .await?;

        info!("凭据分组创建成功: {} (ID: {})", row.name, row.id);
        Ok(row)
    }

    /// 更新分组
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &AuthGroupDraft) -> AppResult<Option<AuthGroup>> {
        let user_group_ids = normalize_group_ids(&draft.user_group_ids);

        let row = sqlx::query_as::<_, AuthGroup>(&format!(
            "UPDATE auth_groups SET name = $2, rate_limit = $3, user_group_ids = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING {}",
            GROUP_COLUMNS
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.rate_limit)
        .bind(&user_group_ids)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除分组
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM auth_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 设置默认分组（同一事务内先清空旧默认，保证至多一个默认分组）
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE auth_groups SET is_default = FALSE WHERE is_default")
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE auth_groups SET is_default = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        info!("默认凭据分组切换为 ID: {}", id);
        Ok(true)
    }

    /// 分组总数（总览页用）
    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
