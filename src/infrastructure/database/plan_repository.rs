//! 订阅套餐数据库操作

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::business::domain::Plan;
use crate::shared::AppResult;

const PLAN_COLUMNS: &str =
    "id, name, month_price, support_models, quotas, is_enabled, created_at, updated_at";

/// 套餐字段集合
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub name: String,
    pub month_price: f64,
    pub support_models: serde_json::Value,
    pub quotas: serde_json::Value,
    pub is_enabled: bool,
}

/// 订阅套餐数据库服务
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 分页查询套餐
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Plan>, i64)> {
        let rows = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {} FROM plans ORDER BY id ASC LIMIT $1 OFFSET $2",
            PLAN_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plans")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 根据ID获取套餐
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Plan>> {
        let row = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {} FROM plans WHERE id = $1",
            PLAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建套餐
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &PlanDraft) -> AppResult<Plan> {
        let row = sqlx::query_as::<_, Plan>(&format!(
            "INSERT INTO plans (name, month_price, support_models, quotas, is_enabled) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PLAN_COLUMNS
        ))
        .bind(&draft.name)
        .bind(draft.month_price)
        .bind(&draft.support_models)
        .bind(&draft.quotas)
        .bind(draft.is_enabled)
        .fetch_one(&self.pool)
        .await?;

        info!("套餐创建成功: {} (ID: {})", row.name, row.id);
        Ok(row)
    }

    /// 更新套餐
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &PlanDraft) -> AppResult<Option<Plan>> {
        let row = sqlx::query_as::<_, Plan>(&format!(
            "UPDATE plans SET name = $2, month_price = $3, support_models = $4, quotas = $5, \
             is_enabled = $6, updated_at = NOW() WHERE id = $1 RETURNING {}",
            PLAN_COLUMNS
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.month_price)
        .bind(&draft.support_models)
        .bind(&draft.quotas)
        .bind(draft.is_enabled)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除套餐
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 切换启用状态
    #[instrument(skip(self))]
    pub async fn set_enabled(&self, id: i64, is_enabled: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE plans SET is_enabled = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(is_enabled)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
