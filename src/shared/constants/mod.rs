//! 常量定义模块

/// JWT相关常量
pub mod jwt {
    pub const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;
    pub const TOKEN_ISSUER: &str = "proxy-admin-console";
}

/// 分页相关常量
pub mod pagination {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// 凭据文件相关常量
pub mod auth_file {
    /// 支持的凭据类型（与网关数据面对齐）
    pub const AUTH_TYPES: &[(&str, &str)] = &[
        ("gemini", "Gemini CLI"),
        ("codex", "Codex"),
        ("claude", "Claude Code"),
        ("antigravity", "Antigravity"),
        ("openai", "OpenAI API"),
    ];

    /// 是否为已知凭据类型
    pub fn is_known_type(auth_type: &str) -> bool {
        AUTH_TYPES.iter().any(|(key, _)| *key == auth_type)
    }

    /// 根据类型标识返回展示名称
    pub fn type_label(auth_type: &str) -> &str {
        AUTH_TYPES
            .iter()
            .find(|(key, _)| *key == auth_type)
            .map(|(_, label)| *label)
            .unwrap_or(auth_type)
    }
}

/// 配额通用解析相关常量
pub mod quota {
    /// 可识别的模型名称字段（通用兜底解析用）
    pub const MODEL_NAME_KEYS: &[&str] = &[
        "name",
        "model",
        "model_name",
        "modelName",
        "model_id",
        "modelId",
        "display_name",
        "displayName",
    ];

    /// 可识别的百分比字段
    pub const PERCENT_KEYS: &[&str] = &[
        "percent",
        "percentage",
        "remaining_percent",
        "remainingPercent",
        "percent_remaining",
        "used_percent",
        "usedPercent",
        "usage_percent",
    ];

    /// 可识别的剩余量字段
    pub const REMAINING_KEYS: &[&str] = &["remaining", "remaining_count", "remainingCount", "left"];

    /// 可识别的已用量字段
    pub const USED_KEYS: &[&str] = &["used", "used_count", "usedCount", "usage"];

    /// 可识别的总量字段
    pub const LIMIT_KEYS: &[&str] = &["limit", "total", "total_count", "totalCount", "quota"];

    /// 可识别的更新时间字段
    pub const UPDATED_AT_KEYS: &[&str] = &["updated_at", "updatedAt", "timestamp", "reset_time", "resetTime"];

    /// 通用解析的最大递归深度
    pub const MAX_SEARCH_DEPTH: usize = 3;
}

#[cfg(test)]
mod tests {
    use super::auth_file::type_label;

    #[test]
    fn test_type_label() {
        assert_eq!(type_label("gemini"), "Gemini CLI");
        // 未知类型原样返回
        assert_eq!(type_label("unknown-type"), "unknown-type");
    }
}
