//! Antigravity 配额形态
//!
//! 形如 `{"models": {"model-key": {"modelProvider": "...",
//! "displayName": "...", "quotaInfo": {"remainingFraction": 0.8,
//! "resetTime": "..."}}}}`，来自 fetchAvailableModels 接口。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{clamp_percent, parse_reset_time, percent_display, QuotaItem};

/// Antigravity 载荷
///
/// 用BTreeMap保证遍历顺序稳定，解析结果才是确定性的。
#[derive(Debug, Clone, Deserialize)]
pub struct AntigravityPayload {
    models: BTreeMap<String, AntigravityModel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AntigravityModel {
    display_name: Option<String>,
    #[allow(dead_code)]
    model_provider: Option<String>,
    quota_info: Option<AntigravityQuotaInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AntigravityQuotaInfo {
    remaining_fraction: Option<f64>,
    reset_time: Option<String>,
}

impl AntigravityPayload {
    /// 探测并解析Antigravity形态：`models` 映射里有值带 `modelProvider` 键
    pub fn try_parse(data: &Value) -> Option<Self> {
        let models = data.get("models")?.as_object()?;
        let has_provider_key = models
            .values()
            .any(|model| model.as_object().map(|obj| obj.contains_key("modelProvider")).unwrap_or(false));
        if !has_provider_key {
            return None;
        }
        serde_json::from_value(data.clone()).ok()
    }

    pub fn into_items(self, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
        self.models
            .into_iter()
            .map(|(key, model)| {
                let name = model
                    .display_name
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or(key);
                let quota_info = model.quota_info;
                let percent = quota_info
                    .as_ref()
                    .and_then(|info| info.remaining_fraction)
                    .map(|fraction| clamp_percent(fraction * 100.0));
                let updated_at = quota_info
                    .as_ref()
                    .and_then(|info| info.reset_time.as_deref())
                    .and_then(parse_reset_time)
                    .unwrap_or(fallback_updated_at);
                QuotaItem {
                    name,
                    percent,
                    percent_display: percent.map(percent_display),
                    updated_at,
                }
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
    fn test_models_map() {
        let data = json!({
            "models": {
                "gemini-3-pro": {
                    "modelProvider": "google",
                    "displayName": "Gemini 3 Pro",
                    "quotaInfo": {"remainingFraction": 0.8, "resetTime": "2024-07-01T00:00:00Z"}
                }
            }
        });
        let items = AntigravityPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Gemini 3 Pro");
        assert!((items[0].percent.unwrap() - 80.0).abs() < 1e-9);
        assert_eq!(items[0].updated_at.to_rfc3339(), "2024-07-01T00:00:00+00:00");
    }

    #[test]
    fn test_map_key_used_without_display_name() {
        let data = json!({
            "models": {
                "claude-sonnet": {"modelProvider": "anthropic", "quotaInfo": {"remainingFraction": 0.1}}
            }
        });
        let items = AntigravityPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].name, "claude-sonnet");
        assert_eq!(items[0].updated_at, fallback());
    }

    #[test]
    fn test_models_without_provider_key_not_claimed() {
        let data = json!({"models": {"m": {"quotaInfo": {"remainingFraction": 0.5}}}});
        assert!(AntigravityPayload::try_parse(&data).is_none());
    }

    #[test]
    fn test_ordering_is_stable() {
        let data = json!({
            "models": {
                "z-model": {"modelProvider": "p"},
                "a-model": {"modelProvider": "p"}
            }
        });
        let items = AntigravityPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].name, "a-model");
        assert_eq!(items[1].name, "z-model");
    }
}
