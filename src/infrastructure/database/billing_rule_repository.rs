//! 计费规则数据库操作

use sqlx::{PgPool, QueryBuilder};
use tracing::{info, instrument};

use crate::business::domain::BillingRule;
use crate::shared::AppResult;

const RULE_COLUMNS: &str = "id, auth_group_id, user_group_id, provider, model, billing_type, \
     price_per_request, input_token_price, output_token_price, cache_read_token_price, \
     cache_write_token_price, created_at, updated_at";

/// 计费规则列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct BillingRuleFilter {
    pub auth_group_id: Option<i64>,
    pub user_group_id: Option<i64>,
    pub provider: Option<String>,
}

/// 计费规则字段集合
#[derive(Debug, Clone)]
pub struct BillingRuleDraft {
    pub auth_group_id: i64,
    pub user_group_id: i64,
    pub provider: String,
    pub model: String,
    pub billing_type: i16,
    pub price_per_request: Option<f64>,
    pub input_token_price: Option<f64>,
    pub output_token_price: Option<f64>,
    pub cache_read_token_price: Option<f64>,
    pub cache_write_token_price: Option<f64>,
}

/// 计费规则数据库服务
#[derive(Debug, Clone)]
pub struct BillingRuleRepository {
    pool: PgPool,
}

impl BillingRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按过滤条件分页查询计费规则
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &BillingRuleFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BillingRule>, i64)> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {} FROM billing_rules WHERE 1=1",
            RULE_COLUMNS
        ));
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM billing_rules WHERE 1=1");

        for builder in [&mut query, &mut count_query] {
            if let Some(auth_group_id) = filter.auth_group_id {
                builder.push(" AND auth_group_id = ").push_bind(auth_group_id);
            }
            if let Some(user_group_id) = filter.user_group_id {
                builder.push(" AND user_group_id = ").push_bind(user_group_id);
            }
            if let Some(ref provider) = filter.provider {
                builder.push(" AND provider = ").push_bind(provider.clone());
            }
        }

        query.push(" ORDER BY id ASC");
        query.push(" LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let rows = query
            .build_query_as::<BillingRule>()
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 根据ID获取计费规则
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<BillingRule>> {
        let row = sqlx::query_as::<_, BillingRule>(&format!(
            "SELECT {} FROM billing_rules WHERE id = $1",
            RULE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 创建计费规则
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &BillingRuleDraft) -> AppResult<BillingRule> {
        let row = sqlx::query_as::<_, BillingRule>(&format!(
            "INSERT INTO billing_rules \
             (auth_group_id, user_group_id, provider, model, billing_type, price_per_request, \
              input_token_price, output_token_price, cache_read_token_price, cache_write_token_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            RULE_COLUMNS
        ))
        .bind(draft.auth_group_id)
        .bind(draft.user_group_id)
        .bind(&draft.provider)
        .bind(&draft.model)
        .bind(draft.billing_type)
        .bind(draft.price_per_request)
        .bind(draft.input_token_price)
        .bind(draft.output_token_price)
        .bind(draft.cache_read_token_price)
        .bind(draft.cache_write_token_price)
        .fetch_one(&self.pool)
        .await?;

        info!("计费规则创建成功: {}/{} (ID: {})", row.provider, row.model, row.id);
        Ok(row)
    }

    /// 更新计费规则
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &BillingRuleDraft) -> AppResult<Option<BillingRule>> {
        let row = sqlx::query_as::<_, BillingRule>(&format!(
            "UPDATE billing_rules SET auth_group_id = $2, user_group_id = $3, provider = $4, \
             model = $5, billing_type = $6, price_per_request = $7, input_token_price = $8, \
             output_token_price = $9, cache_read_token_price = $10, cache_write_token_price = $11, \
             updated_at = NOW() WHERE id = $1 RETURNING {}",
            RULE_COLUMNS
        ))
        .bind(id)
        .bind(draft.auth_group_id)
        .bind(draft.user_group_id)
        .bind(&draft.provider)
        .bind(&draft.model)
        .bind(draft.billing_type)
        .bind(draft.price_per_request)
        .bind(draft.input_token_price)
        .bind(draft.output_token_price)
        .bind(draft.cache_read_token_price)
        .bind(draft.cache_write_token_price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 删除计费规则
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM billing_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
