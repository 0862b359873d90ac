//! 通用配额兜底解析
//!
//! 没有命中任何已知提供商形态时，在载荷里递归寻找"最像配额列表"
//! 的对象数组：按可识别的模型名字段和百分比/用量字段打分，
//! 得分最高的数组胜出。打分遍历是深度优先、键序稳定的，
//! 平分时保留先遇到的数组——下游依赖这个次序，不要"修正"它。

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{clamp_percent, parse_reset_time, percent_display, QuotaItem};
use crate::shared::constants::quota::{
    LIMIT_KEYS, MAX_SEARCH_DEPTH, MODEL_NAME_KEYS, PERCENT_KEYS, REMAINING_KEYS, UPDATED_AT_KEYS,
    USED_KEYS,
};

/// 从未识别的载荷里兜底抽取配额条目
pub fn extract_items(data: &Value, fallback_updated_at: DateTime<Utc>) -> Vec<QuotaItem> {
    let mut best: Option<(u32, &Vec<Value>)> = None;
    find_best_array(data, 0, &mut best);

    let Some((_, array)) = best else {
        return Vec::new();
    };

    array
        .iter()
        .enumerate()
        .filter_map(|(index, element)| element_to_item(index, element, fallback_updated_at))
        .collect()
}

/// 深度优先扫描候选数组，严格大于才替换，平分保留先遇到的
fn find_best_array<'a>(value: &'a Value, depth: usize, best: &mut Option<(u32, &'a Vec<Value>)>) {
    if depth > MAX_SEARCH_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            let score = score_array(items);
            if score > 0 && best.map(|(top, _)| score > top).unwrap_or(true) {
                *best = Some((score, items));
            }
            for item in items {
                find_best_array(item, depth + 1, best);
            }
        }
        Value::Object(map) => {
            // serde_json的Map按键序遍历，次序稳定
            for child in map.values() {
                find_best_array(child, depth + 1, best);
            }
        }
        _ => {}
    }
}

/// 给候选数组打分：模型名字段计2分，百分比或可推导的用量字段各计1分
fn score_array(items: &[Value]) -> u32 {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| {
            let mut score = 0;
            if MODEL_NAME_KEYS
                .iter()
                .any(|key| obj.get(*key).and_then(Value::as_str).map(|s| !s.trim().is_empty()).unwrap_or(false))
            {
                score += 2;
            }
            if PERCENT_KEYS.iter().any(|key| obj.get(*key).and_then(as_number).is_some()) {
                score += 1;
            }
            if derived_percent(obj).is_some() {
                score += 1;
            }
            score
        })
        .sum()
}

fn element_to_item(
    index: usize,
    element: &Value,
    fallback_updated_at: DateTime<Utc>,
) -> Option<QuotaItem> {
    let obj = element.as_object()?;

    let name = MODEL_NAME_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let percent = direct_percent(obj).or_else(|| derived_percent(obj));

    // 既无名称又算不出百分比的元素不产出条目
    if name.is_none() && percent.is_none() {
        return None;
    }

    let updated_at = UPDATED_AT_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(parse_timestamp))
        .unwrap_or(fallback_updated_at);

    Some(QuotaItem {
        name: name.unwrap_or_else(|| format!("item-{}", index + 1)),
        percent,
        percent_display: percent.map(percent_display),
        updated_at,
    })
}

/// 直接的百分比字段：≤1的比例按小数百分比放大，"used"字段取补
fn direct_percent(obj: &serde_json::Map<String, Value>) -> Option<f64> {
    let (key, raw) = PERCENT_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_number).map(|value| (*key, value)))?;

    let mut value = raw;
    if (0.0..=1.0).contains(&value) {
        value *= 100.0;
    }
    if key.to_lowercase().contains("used") || key.to_lowercase().contains("usage") {
        value = 100.0 - value;
    }
    Some(clamp_percent(value))
}

/// 由用量字段推导百分比：remaining/limit → used/limit → remaining/(used+remaining)
fn derived_percent(obj: &serde_json::Map<String, Value>) -> Option<f64> {
    let field = |keys: &[&str]| keys.iter().find_map(|key| obj.get(*key).and_then(as_number));

    let remaining = field(REMAINING_KEYS);
    let used = field(USED_KEYS);
    let limit = field(LIMIT_KEYS).filter(|value| *value > 0.0);

    if let (Some(remaining), Some(limit)) = (remaining, limit) {
        return Some(clamp_percent(remaining / limit * 100.0));
    }
    if let (Some(used), Some(limit)) = (used, limit) {
        return Some(clamp_percent(100.0 - used / limit * 100.0));
    }
    if let (Some(remaining), Some(used)) = (remaining, used) {
        let total = remaining + used;
        if total > 0.0 {
            return Some(clamp_percent(remaining / total * 100.0));
        }
    }
    None
}

/// 宽松取数：数字直取，字符串去掉百分号和千分位逗号再parse
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').replace(',', "").parse().ok(),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_reset_time(text),
        Value::Number(number) => {
            let raw = number.as_i64()?;
            // 13位按毫秒处理
            if raw > 1_000_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }
        _ => None,
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
    fn test_direct_percent_field() {
        let data = json!({"usage": [{"model": "gpt-5", "remaining_percent": 65}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "gpt-5");
        assert_eq!(items[0].percent, Some(65.0));
    }

    #[test]
    fn test_fraction_is_scaled() {
        let data = json!({"usage": [{"model": "m", "percent": 0.42}]});
        let items = extract_items(&data, fallback());
        assert!((items[0].percent.unwrap() - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_used_percent_is_inverted() {
        let data = json!({"usage": [{"model": "m", "used_percent": 30}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].percent, Some(70.0));
    }

    #[test]
    fn test_derived_from_remaining_and_limit() {
        let data = json!({"stats": [{"name": "m", "remaining": 25, "limit": 100}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].percent, Some(25.0));
    }

    #[test]
    fn test_derived_from_used_and_limit() {
        let data = json!({"stats": [{"name": "m", "used": 80, "limit": 100}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].percent, Some(20.0));
    }

    #[test]
    fn test_derived_from_used_and_remaining() {
        let data = json!({"stats": [{"name": "m", "used": 30, "remaining": 10}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].percent, Some(25.0));
    }

    #[test]
    fn test_highest_score_wins_ties_keep_first() {
        // 两个数组分数相同，保留键序更靠前的"a"
        let data = json!({
            "a": [{"model": "from-a", "percent": 10}],
            "b": [{"model": "from-b", "percent": 20}]
        });
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].name, "from-a");

        // 分数更高的数组胜出，与键序无关
        let data = json!({
            "a": [{"percent": 10}],
            "b": [{"model": "named", "percent": 20}]
        });
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].name, "named");
    }

    #[test]
    fn test_depth_limit() {
        // 深度4的数组不在搜索范围内
        let data = json!({"l1": {"l2": {"l3": {"l4": [{"model": "deep", "percent": 1}]}}}});
        assert!(extract_items(&data, fallback()).is_empty());
    }

    #[test]
    fn test_no_structure_yields_empty() {
        assert!(extract_items(&json!({"a": 1, "b": "c"}), fallback()).is_empty());
        assert!(extract_items(&json!([1, 2, 3]), fallback()).is_empty());
    }

    #[test]
    fn test_string_numbers_are_accepted() {
        let data = json!({"usage": [{"model": "m", "percent": "85%"}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].percent, Some(85.0));
    }

    #[test]
    fn test_per_item_timestamp() {
        let data = json!({"usage": [{"model": "m", "percent": 5, "updated_at": "2024-03-01T00:00:00Z"}]});
        let items = extract_items(&data, fallback());
        assert_eq!(items[0].updated_at.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }
}
