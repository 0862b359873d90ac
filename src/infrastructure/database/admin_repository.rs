//! 管理员数据库操作

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::business::domain::Admin;
use crate::shared::AppResult;

const ADMIN_COLUMNS: &str =
    "id, username, password_hash, is_super_admin, permissions, active, created_at, updated_at";

/// 管理员字段集合（密码另走专用方法）
#[derive(Debug, Clone)]
pub struct AdminDraft {
    pub username: String,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub active: bool,
}

/// 管理员数据库服务
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取全部管理员（管理员数量有限，不分页）
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> AppResult<Vec<Admin>> {
        let rows = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins ORDER BY id ASC",
            ADMIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 根据ID获取管理员
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, admin_id: i64) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE id = $1",
            ADMIN_COLUMNS
        ))
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 根据用户名获取管理员（登录用）
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE username = $1",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建管理员
    #[instrument(skip(self, draft, password_hash))]
    pub async fn create(&self, draft: &AdminDraft, password_hash: &str) -> AppResult<Admin> {
        let row = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (username, password_hash, is_super_admin, permissions, active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(&draft.username)
        .bind(password_hash)
        .bind(draft.is_super_admin)
        .bind(&draft.permissions)
        .bind(draft.active)
        .fetch_one(&self.pool)
        .await?;

        info!("管理员创建成功: {} (ID: {})", row.username, row.id);
        Ok(row)
    }

    /// 更新管理员基本信息和权限
    #[instrument(skip(self, draft))]
    pub async fn update(&self, admin_id: i64, draft: &AdminDraft) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins SET username = $2, is_super_admin = $3, permissions = $4, \
             active = $5, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(admin_id)
        .bind(&draft.username)
        .bind(draft.is_super_admin)
        .bind(&draft.permissions)
        .bind(draft.active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除管理员
    #[instrument(skip(self))]
    pub async fn delete(&self, admin_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 更新密码哈希（重置密码用）
    #[instrument(skip(self, password_hash))]
    pub async fn set_password(&self, admin_id: i64, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE admins SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(admin_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("管理员密码已重置 (ID: {})", admin_id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// 超级管理员数量（最后一个超管禁止删除/降级）
    #[instrument(skip(self))]
    pub async fn count_super_admins(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admins WHERE is_super_admin AND active",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
