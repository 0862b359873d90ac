//! 配额载荷解析模块
//!
//! 网关数据面为每份凭据缓存一份提供商特有的配额快照JSON，
//! 这里把各种上游形态统一解析成 `{name, percent, updated_at}` 列表。
//!
//! 解析按优先级尝试，第一个命中的形态生效：
//! 1. Gemini `buckets` 数组
//! 2. Codex `rate_limit` / `code_review_rate_limit` 窗口
//! 3. Antigravity `models` 映射
//! 4. 通用兜底：递归打分挑选最像配额数组的结构
//!
//! 解析是纯函数：相同输入必须产生相同输出。

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub mod antigravity;
pub mod codex;
pub mod gemini;
pub mod generic;

pub use antigravity::AntigravityPayload;
pub use codex::CodexPayload;
pub use gemini::GeminiPayload;

/// 统一的配额条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaItem {
    /// 展示名称（模型名或窗口标签）
    pub name: String,
    /// 剩余百分比，范围 [0, 100]，无法得出时为空
    pub percent: Option<f64>,
    /// 展示用的百分比文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_display: Option<String>,
    /// 条目更新时间（取不到时用快照时间兜底）
    pub updated_at: DateTime<Utc>,
}

/// 已识别的配额载荷形态
#[derive(Debug, Clone)]
pub enum QuotaPayload {
    Gemini(GeminiPayload),
    Codex(CodexPayload),
    Antigravity(AntigravityPayload),
    /// 未识别出固定形态，交给通用打分器
    Generic(Value),
}

impl QuotaPayload {
    /// 按优先级探测载荷形态
    pub fn parse(data: &Value) -> Self {
        if let Some(payload) = GeminiPayload::try_parse(data) {
            return QuotaPayload::Gemini(payload);
        }
        if let Some(payload) = CodexPayload::try_parse(data) {
            return QuotaPayload::Codex(payload);
        }
        if let Some(payload) = AntigravityPayload::try_parse(data) {
            return QuotaPayload::Antigravity(payload);
        }
        QuotaPayload::Generic(data.clone())
    }

    /// 展开成统一条目列表
    pub fn into_items(self, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
        match self {
            QuotaPayload::Gemini(payload) => payload.into_items(fallback_updated_at),
            QuotaPayload::Codex(payload) => payload.into_items(fallback_updated_at),
            QuotaPayload::Antigravity(payload) => payload.into_items(fallback_updated_at),
            QuotaPayload::Generic(value) => generic::extract_items(&value, fallback_updated_at),
        }
    }
}

/// 把一份原始配额快照解析成统一条目列表
///
/// 没有任何结构命中时返回空列表。
pub fn normalize_quota_payload(data: &Value, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
    QuotaPayload::parse(data).into_items(fallback_updated_at)
}

/// 百分比统一收敛到 [0, 100]
pub(crate) fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// 百分比的展示文本
pub(crate) fn percent_display(percent: f64) -> String {
    format!("{:.0}%", percent)
}

/// 解析RFC3339格式的时间字符串
pub(crate) fn parse_reset_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_priority_gemini_wins_over_generic() {
        // buckets 命中后不再进入通用解析
        let data = json!({
            "buckets": [{"modelId": "gemini-pro", "remainingFraction": 0.5}],
            "items": [{"name": "x", "percent": 10}]
        });
        let items = normalize_quota_payload(&data, fallback());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "gemini-pro");
    }

    #[test]
    fn test_unrecognized_flat_object_yields_empty() {
        let data = json!({"foo": 1, "bar": "baz"});
        assert!(normalize_quota_payload(&data, fallback()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let data = json!({
            "models": {
                "b-model": {"modelProvider": "google", "quotaInfo": {"remainingFraction": 0.2}},
                "a-model": {"modelProvider": "google", "quotaInfo": {"remainingFraction": 0.8}}
            }
        });
        let first = normalize_quota_payload(&data, fallback());
        let second = normalize_quota_payload(&data, fallback());
        assert_eq!(first, second);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-5.0), 0.0);
        assert_eq!(clamp_percent(137.0), 100.0);
        assert_eq!(clamp_percent(42.0), 42.0);
    }
}
