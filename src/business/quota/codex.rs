//! Codex 配额形态
//!
//! 形如 `{"rate_limit": {"primary_window": {...}, "secondary_window": {...}},
//! "code_review_rate_limit": {...}}`。窗口内是已用百分比和秒级周期，
//! 剩余百分比按 `100 - used_percent` 推算。

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{clamp_percent, percent_display, QuotaItem};

/// Codex 载荷
#[derive(Debug, Clone, Deserialize)]
pub struct CodexPayload {
    rate_limit: Option<CodexRateLimit>,
    code_review_rate_limit: Option<CodexRateLimit>,
}

#[derive(Debug, Clone, Deserialize)]
struct CodexRateLimit {
    primary_window: Option<CodexWindow>,
    secondary_window: Option<CodexWindow>,
}

#[derive(Debug, Clone, Deserialize)]
struct CodexWindow {
    used_percent: Option<f64>,
    limit_reached: Option<bool>,
    allowed: Option<bool>,
    #[serde(alias = "window_seconds")]
    limit_window_seconds: Option<i64>,
    /// 绝对重置时间（epoch秒）
    #[serde(alias = "reset_at")]
    resets_at: Option<i64>,
    /// 相对重置时间（距快照时间的秒数）
    #[serde(alias = "reset_after_seconds")]
    resets_in_seconds: Option<i64>,
}

impl CodexPayload {
    /// 探测并解析Codex形态
    pub fn try_parse(data: &Value) -> Option<Self> {
        let has_window = |key: &str| {
            data.get(key)
                .and_then(Value::as_object)
                .map(|obj| obj.contains_key("primary_window") || obj.contains_key("secondary_window"))
                .unwrap_or(false)
        };
        if !has_window("rate_limit") && !has_window("code_review_rate_limit") {
            return None;
        }
        serde_json::from_value(data.clone()).ok()
    }

    pub fn into_items(self, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
        let mut items = Vec::new();
        if let Some(rate_limit) = self.rate_limit {
            rate_limit.collect_items("", fallback_updated_at, &mut items);
        }
        if let Some(rate_limit) = self.code_review_rate_limit {
            rate_limit.collect_items("Code Review ", fallback_updated_at, &mut items);
        }
        items
    }
}

impl CodexRateLimit {
    fn collect_items(self, prefix: &str, fallback: DateTime<Utc>, out: &mut Vec<QuotaItem>) {
        if let Some(window) = self.primary_window {
            out.push(window.into_item(prefix, "Primary", fallback));
        }
        if let Some(window) = self.secondary_window {
            out.push(window.into_item(prefix, "Secondary", fallback));
        }
    }
}

impl CodexWindow {
    fn into_item(self, prefix: &str, default_label: &str, fallback: DateTime<Utc>) -> QuotaItem {
        // 触限或不允许直接视为剩余0
        let percent = if self.limit_reached == Some(true) || self.allowed == Some(false) {
            Some(0.0)
        } else {
            self.used_percent.map(|used| clamp_percent(100.0 - used))
        };

        let label = self
            .limit_window_seconds
            .filter(|seconds| *seconds > 0)
            .map(window_label)
            .unwrap_or_else(|| default_label.to_string());

        let updated_at = self
            .resets_at
            .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
            .or_else(|| {
                self.resets_in_seconds
                    .map(|seconds| fallback + Duration::seconds(seconds))
            })
            .unwrap_or(fallback);

        QuotaItem {
            name: format!("{}{}", prefix, label),
            percent,
            percent_display: percent.map(percent_display),
            updated_at,
        }
    }
}

/// 把秒级周期压成人类可读标签：
/// ≥7天 → "Weekly"，≥1天 → "Daily"，其余按小时/分钟/秒
fn window_label(seconds: i64) -> String {
    const DAY: i64 = 86_400;
    const HOUR: i64 = 3_600;
    const MINUTE: i64 = 60;

    if seconds >= 7 * DAY {
        "Weekly".to_string()
    } else if seconds >= DAY {
        "Daily".to_string()
    } else if seconds >= HOUR {
        format!("{}h", seconds / HOUR)
    } else if seconds >= MINUTE {
        format!("{}m", seconds / MINUTE)
    } else {
        format!("{}s", seconds)
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
    fn test_primary_window_percent_and_label() {
        let data = json!({
            "rate_limit": {
                "primary_window": {"used_percent": 80.0, "limit_window_seconds": 18000}
            }
        });
        let items = CodexPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].percent, Some(20.0));
        assert!(items[0].name.contains("5h"));
    }

    #[test]
    fn test_limit_reached_forces_zero() {
        let data = json!({
            "rate_limit": {
                "primary_window": {"used_percent": 30.0, "limit_reached": true},
                "secondary_window": {"used_percent": 10.0, "allowed": false}
            }
        });
        let items = CodexPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].percent, Some(0.0));
        assert_eq!(items[1].percent, Some(0.0));
    }

    #[test]
    fn test_window_labels() {
        assert_eq!(window_label(7 * 86_400), "Weekly");
        assert_eq!(window_label(10 * 86_400), "Weekly");
        assert_eq!(window_label(86_400), "Daily");
        assert_eq!(window_label(18_000), "5h");
        assert_eq!(window_label(300), "5m");
        assert_eq!(window_label(45), "45s");
    }

    #[test]
    fn test_reset_time_resolution() {
        // 绝对epoch优先
        let data = json!({
            "rate_limit": {
                "primary_window": {"used_percent": 0.0, "resets_at": 1717286400}
            }
        });
        let items = CodexPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].updated_at.timestamp(), 1_717_286_400);

        // 相对秒数基于快照时间
        let data = json!({
            "rate_limit": {
                "primary_window": {"used_percent": 0.0, "resets_in_seconds": 120}
            }
        });
        let items = CodexPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].updated_at, fallback() + Duration::seconds(120));
    }

    #[test]
    fn test_code_review_windows_are_prefixed() {
        let data = json!({
            "code_review_rate_limit": {
                "primary_window": {"used_percent": 50.0, "limit_window_seconds": 604800}
            }
        });
        let items = CodexPayload::try_parse(&data).unwrap().into_items(fallback());
        assert_eq!(items[0].name, "Code Review Weekly");
    }

    #[test]
    fn test_rate_limit_without_windows_not_claimed() {
        let data = json!({"rate_limit": {"requests": 10}});
        assert!(CodexPayload::try_parse(&data).is_none());
    }
}
