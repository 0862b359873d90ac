//! 配额快照数据库操作
//!
//! 快照由数据面定期写入，管理端只做查询和展示

use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;

use crate::business::domain::QuotaRecord;
use crate::shared::AppResult;

/// 配额快照列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct QuotaFilter {
    pub auth_id: Option<i64>,
    pub auth_type: Option<String>,
}

/// 配额快照数据库服务
#[derive(Debug, Clone)]
pub struct QuotaRepository {
    pool: PgPool,
}

impl QuotaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按过滤条件分页查询配额快照
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &QuotaFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuotaRecord>, i64)> {
        let mut query = QueryBuilder::new(
            "SELECT id, auth_id, auth_type, data, updated_at FROM quotas WHERE 1=1",
        );
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM quotas WHERE 1=1");

        for builder in [&mut query, &mut count_query] {
            if let Some(auth_id) = filter.auth_id {
                builder.push(" AND auth_id = ").push_bind(auth_id);
            }
            if let Some(ref auth_type) = filter.auth_type {
                builder.push(" AND auth_type = ").push_bind(auth_type.clone());
            }
        }

        query.push(" ORDER BY updated_at DESC, id DESC");
        query.push(" LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let rows = query
            .build_query_as::<QuotaRecord>()
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 根据ID获取配额快照
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<QuotaRecord>> {
        let row = sqlx::query_as::<_, QuotaRecord>(
            "SELECT id, auth_id, auth_type, data, updated_at FROM quotas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 根据凭据ID获取最新一条配额快照
    #[instrument(skip(self))]
    pub async fn get_latest_by_auth_id(&self, auth_id: i64) -> AppResult<Option<QuotaRecord>> {
        let row = sqlx::query_as::<_, QuotaRecord>(
            "SELECT id, auth_id, auth_type, data, updated_at FROM quotas \
             WHERE auth_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
