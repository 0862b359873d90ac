//! 批量操作执行器
//!
//! 批量操作把N个独立请求扇出、等待全部结束、汇总部分失败。
//! 成功的条目不回滚，失败的条目一次性上报，由操作者自行重试。

use futures::future::join_all;
use serde::Serialize;
use std::future::Future;

use crate::shared::AppResult;

/// 单个条目的失败记录
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// 条目标识（ID或原始输入）
    pub item: String,
    pub message: String,
}

/// 批量操作汇总
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// 扇出执行一批独立操作，等待全部落定后汇总
///
/// 每个条目带一个用于上报的标识标签。
pub async fn run_batch<I, F, Fut>(items: Vec<(String, I)>, op: F) -> BatchReport
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let total = items.len();
    let tasks = items.into_iter().map(|(label, input)| {
        let task = op(input);
        async move { (label, task.await) }
    });

    let outcomes = join_all(tasks).await;

    let mut errors = Vec::new();
    for (label, outcome) in outcomes {
        if let Err(error) = outcome {
            errors.push(BatchFailure {
                item: label,
                message: error.to_string(),
            });
        }
    }

    BatchReport {
        total,
        succeeded: total - errors.len(),
        failed: errors.len(),
        errors,
    }
}

/// 轮询分配：第 i 个目标分到 `pool[i % M]`
///
/// 池为空时不产生任何分配。
pub fn round_robin_assign<T: Clone>(targets: &[i64], pool: &[T]) -> Vec<(i64, T)> {
    if pool.is_empty() {
        return Vec::new();
    }
    targets
        .iter()
        .enumerate()
        .map(|(index, target)| (*target, pool[index % pool.len()].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::AppError;

    #[test]
    fn test_round_robin_assignment() {
        let targets = vec![11, 12, 13, 14, 15];
        let pool = vec!["a", "b"];
        let assigned = round_robin_assign(&targets, &pool);
        assert_eq!(assigned, vec![(11, "a"), (12, "b"), (13, "a"), (14, "b"), (15, "a")]);
    }

    #[test]
    fn test_round_robin_empty_pool() {
        assert!(round_robin_assign::<&str>(&[1, 2], &[]).is_empty());
    }

    #[tokio::test]
    async fn test_run_batch_reports_partial_failure() {
        let items = vec![
            ("1".to_string(), 1),
            ("2".to_string(), 2),
            ("3".to_string(), 3),
        ];
        let report = run_batch(items, |n| async move {
            if n == 2 {
                Err(AppError::Business("不支持的条目".to_string()))
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].item, "2");
        assert!(!report.all_succeeded());
    }
}
