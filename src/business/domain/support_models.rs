//! 套餐支持模型规整
//!
//! `support_models` 的历史存储形态不统一：字符串数组、
//! `{provider, name}` 对象数组、或再被JSON编码一层的字符串。
//! 这里统一解码并按 `(provider, name)` 去重，保留首次出现的顺序。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// 规整后的支持模型条目
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportModel {
    pub provider: String,
    pub name: String,
}

impl SupportModel {
    /// 裸字符串条目：首个 `/` 之前为提供商，没有 `/` 则提供商为空
    fn from_plain(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.split_once('/') {
            Some((provider, name)) if !name.trim().is_empty() => Some(Self {
                provider: provider.trim().to_string(),
                name: name.trim().to_string(),
            }),
            _ => Some(Self {
                provider: String::new(),
                name: text.to_string(),
            }),
        }
    }

    fn from_object(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name").and_then(Value::as_str)?.trim();
        if name.is_empty() {
            return None;
        }
        let provider = obj
            .get("provider")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();
        Some(Self {
            provider: provider.to_string(),
            name: name.to_string(),
        })
    }
}

/// 规整支持模型字段：解码任意历史形态、按 `(provider, name)` 去重
pub fn clean_support_models(raw: &Value) -> Vec<SupportModel> {
    let items = match raw {
        Value::Array(items) => items.clone(),
        // 再编码一层的字符串：先解出内层JSON再按数组处理
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            Ok(Value::String(single)) => vec![Value::String(single)],
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in &items {
        let model = match item {
            Value::String(text) => SupportModel::from_plain(text),
            Value::Object(_) => SupportModel::from_object(item),
            _ => None,
        };
        if let Some(model) = model {
            if seen.insert((model.provider.clone(), model.name.clone())) {
                out.push(model);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_array() {
        let raw = json!([
            {"provider": "gemini", "name": "gemini-pro"},
            {"provider": "codex", "name": "gpt-5"},
        ]);
        let models = clean_support_models(&raw);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].provider, "gemini");
        assert_eq!(models[0].name, "gemini-pro");
    }

    #[test]
    fn test_string_array_with_provider_prefix() {
        let raw = json!(["gemini/gemini-pro", "claude-sonnet"]);
        let models = clean_support_models(&raw);
        assert_eq!(models[0], SupportModel { provider: "gemini".into(), name: "gemini-pro".into() });
        assert_eq!(models[1], SupportModel { provider: "".into(), name: "claude-sonnet".into() });
    }

    #[test]
    fn test_json_encoded_string() {
        let raw = json!("[{\"provider\":\"codex\",\"name\":\"gpt-5\"}]");
        let models = clean_support_models(&raw);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "gpt-5");
    }

    #[test]
    fn test_dedup_regardless_of_order_and_count() {
        let raw = json!([
            "gemini/gemini-pro",
            {"provider": "gemini", "name": "gemini-pro"},
            "gemini/gemini-pro",
            {"provider": "codex", "name": "gpt-5"},
            {"provider": "gemini", "name": "gemini-pro"},
        ]);
        let models = clean_support_models(&raw);
        assert_eq!(models.len(), 2);
        // 首次出现的顺序保留
        assert_eq!(models[0].name, "gemini-pro");
        assert_eq!(models[1].name, "gpt-5");
    }

    #[test]
    fn test_unusable_input_yields_empty() {
        assert!(clean_support_models(&json!(42)).is_empty());
        assert!(clean_support_models(&json!("not json at all")).is_empty());
        assert!(clean_support_models(&json!([null, 7])).is_empty());
    }
}
