//! Gemini 配额形态
//!
//! 形如 `{"buckets": [{"modelId": "...", "remainingFraction": 0.42,
//! "resetTime": "..."}]}`。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{clamp_percent, parse_reset_time, percent_display, QuotaItem};

/// Gemini 载荷
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiPayload {
    buckets: Vec<GeminiBucket>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiBucket {
    model_id: Option<String>,
    remaining_fraction: Option<f64>,
    reset_time: Option<String>,
}

impl GeminiPayload {
    /// 探测并解析Gemini形态
    pub fn try_parse(data: &Value) -> Option<Self> {
        let buckets = data.get("buckets")?.as_array()?;
        if !buckets.iter().all(Value::is_object) {
            return None;
        }
        // 非空时至少有一个元素带Gemini特征字段，避免误吞通用数组
        let looks_like_gemini = buckets.is_empty()
            || buckets.iter().any(|bucket| {
                bucket.get("modelId").is_some()
                    || bucket.get("remainingFraction").is_some()
                    || bucket.get("resetTime").is_some()
            });
        if !looks_like_gemini {
            return None;
        }
        serde_json::from_value(data.clone()).ok()
    }

    pub fn into_items(self, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
        self.buckets
            .into_iter()
            .filter_map(|bucket| {
                let name = bucket.model_id?;
                let percent = bucket
                    .remaining_fraction
                    .map(|fraction| clamp_percent(fraction * 100.0));
                let updated_at = bucket
                    .reset_time
                    .as_deref()
                    .and_then(parse_reset_time)
                    .unwrap_or(fallback_updated_at);
                Some(QuotaItem {
                    name,
                    percent,
                    percent_display: percent.map(percent_display),
                    updated_at,
                })
            })
            .collect()
    }
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
    fn test_basic_bucket() {
        let data = json!({
            "buckets": [
                {"modelId": "gemini-pro", "remainingFraction": 0.42, "resetTime": "2024-01-01T00:00:00Z"}
            ]
        });
        let items = GeminiPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "gemini-pro");
        assert!((items[0].percent.unwrap() - 42.0).abs() < 1e-9);
        assert_eq!(items[0].updated_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let data = json!({"buckets": [{"modelId": "gemini-flash"}]});
        let items = GeminiPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].percent, None);
        assert_eq!(items[0].updated_at, fallback());
    }

    #[test]
    fn test_bucket_without_model_id_is_skipped() {
        let data = json!({"buckets": [{"remainingFraction": 0.5}, {"modelId": "m", "remainingFraction": 1.2}]});
        let items = GeminiPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items.len(), 1);
        // 超过1的比例也收敛进 [0, 100]
        assert_eq!(items[0].percent, Some(100.0));
    }

    #[test]
    fn test_foreign_array_not_claimed() {
        let data = json!({"buckets": [{"name": "x", "percent": 10}]});
        assert!(GeminiPayload::try_parse(&data).is_none());
    }
}
