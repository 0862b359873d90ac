//! 工具函数模块

/// 按行拆分批量输入，去掉空行和首尾空白
pub fn split_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 宽松数字解析：解析失败回退为0
pub fn parse_number_or_zero(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(0.0)
}

/// 宽松整数解析：负数或解析失败回退为0
pub fn parse_non_negative_or_zero(input: &str) -> i64 {
    input.trim().parse::<i64>().map(|v| v.max(0)).unwrap_or(0)
}

/// 表单数字字段可能是JSON数字也可能是字符串，统一宽松解析
pub fn coerce_number_or_zero(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_number_or_zero(s),
        _ => 0.0,
    }
}

/// 同上，但限定非负整数
pub fn coerce_non_negative_i32(value: &serde_json::Value) -> i32 {
    match value {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0).max(0) as i32,
        serde_json::Value::String(s) => parse_non_negative_or_zero(s) as i32,
        _ => 0,
    }
}

/// 验证工具
pub mod validation {
    /// 验证用户名（字母数字加下划线，3-20位）
    pub fn is_valid_username(username: &str) -> bool {
        if username.len() < 3 || username.len() > 20 {
            return false;
        }

        username.chars().all(|c| c.is_alphanumeric() || c == '_')
    }

    /// 验证密码强度（至少8位，包含字母和数字）
    pub fn is_strong_password(password: &str) -> bool {
        if password.len() < 8 {
            return false;
        }

        let has_letter = password.chars().any(|c| c.is_alphabetic());
        let has_number = password.chars().any(|c| c.is_numeric());

        has_letter && has_number
    }

    /// 验证实体名称（非空、不超过64字符、无首尾空白）
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && name.len() <= 64 && name.trim() == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        let input = "http://a:8080\n\n  http://b:8080  \n";
        assert_eq!(split_lines(input), vec!["http://a:8080", "http://b:8080"]);
    }

    #[test]
    fn test_parse_number_or_zero() {
        assert_eq!(parse_number_or_zero("3.5"), 3.5);
        assert_eq!(parse_number_or_zero("abc"), 0.0);
        assert_eq!(parse_number_or_zero(""), 0.0);
    }

    #[test]
    fn test_parse_non_negative_or_zero() {
        assert_eq!(parse_non_negative_or_zero("42"), 42);
        assert_eq!(parse_non_negative_or_zero("-3"), 0);
        assert_eq!(parse_non_negative_or_zero("x"), 0);
    }

    #[test]
    fn test_coerce_number_fields() {
        use serde_json::json;

        assert_eq!(coerce_number_or_zero(&json!(2.5)), 2.5);
        assert_eq!(coerce_number_or_zero(&json!("7")), 7.0);
        assert_eq!(coerce_number_or_zero(&json!(null)), 0.0);

        assert_eq!(coerce_non_negative_i32(&json!(10)), 10);
        assert_eq!(coerce_non_negative_i32(&json!(-10)), 0);
        assert_eq!(coerce_non_negative_i32(&json!("3")), 3);
        assert_eq!(coerce_non_negative_i32(&json!([])), 0);
    }

    #[test]
    fn test_validation() {
        use validation::*;

        assert!(is_valid_username("admin_01"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("bad-name"));

        assert!(is_strong_password("password123"));
        assert!(!is_strong_password("password"));

        assert!(is_valid_name("默认分组"));
        assert!(!is_valid_name(" padded "));
    }
}
