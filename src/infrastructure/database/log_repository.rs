//! 请求日志数据库操作
//!
//! 日志由数据面写入，管理端只做查询和清理

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use tracing::{info, instrument};

use crate::business::domain::RequestLog;
use crate::shared::AppResult;

/// 请求日志列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct LogFilter {
    pub auth_id: Option<i64>,
    pub provider: Option<String>,
    pub only_errors: bool,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

/// 请求日志数据库服务
#[derive(Debug, Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按过滤条件分页查询请求日志
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &LogFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<RequestLog>, i64)> {
        let mut query = QueryBuilder::new(
            "SELECT id, auth_id, provider, model, status_code, message, created_at \
             FROM request_logs WHERE 1=1",
        );
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM request_logs WHERE 1=1");

        for builder in [&mut query, &mut count_query] {
            if let Some(auth_id) = filter.auth_id {
                builder.push(" AND auth_id = ").push_bind(auth_id);
            }
            if let Some(ref provider) = filter.provider {
                builder.push(" AND provider = ").push_bind(provider.clone());
            }
            if filter.only_errors {
                builder.push(" AND status_code >= 400");
            }
            if let Some(since) = filter.since {
                builder.push(" AND created_at >= ").push_bind(since);
            }
            if let Some(until) = filter.until {
                builder.push(" AND created_at <= ").push_bind(until);
            }
        }

        query.push(" ORDER BY created_at DESC, id DESC");
        query.push(" LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let rows = query
            .build_query_as::<RequestLog>()
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// 清空某时间点之前的日志
    #[instrument(skip(self))]
    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM request_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        info!("清理请求日志 {} 条", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// 近24小时请求数与错误数（总览页用）
    #[instrument(skip(self))]
    pub async fn count_recent(&self) -> AppResult<(i64, i64)> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status_code >= 400) \
             FROM request_logs WHERE created_at >= NOW() - INTERVAL '24 hours'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
