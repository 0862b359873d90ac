//! 权限开关
//!
//! 权限键是 `"METHOD 路径模板"` 的字符串拼接，路径模板保留
//! `:id` 这类字面占位符，不做插值。这里只决定界面要不要露出
//! 某个入口；后端每个接口仍然独立复查一遍。

/// 计算权限键：`METHOD + " " + 路径模板`
pub fn permission_key(method: &str, path_template: &str) -> String {
    format!("{} {}", method.to_uppercase(), path_template)
}

/// 判定权限：超级管理员直接放行，否则精确匹配权限集合
pub fn has_permission(
    is_super_admin: bool,
    permissions: &[String],
    method: &str,
    path_template: &str,
) -> bool {
    if is_super_admin {
        return true;
    }
    let key = permission_key(method, path_template);
    permissions.iter().any(|granted| granted == &key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_key_format() {
        assert_eq!(
            permission_key("get", "/v0/admin/auth-files"),
            "GET /v0/admin/auth-files"
        );
        assert_eq!(
            permission_key("DELETE", "/v0/admin/auth-files/:id"),
            "DELETE /v0/admin/auth-files/:id"
        );
    }

    #[test]
    fn test_exact_match_required() {
        let granted = vec!["GET /v0/admin/proxies".to_string()];

        assert!(has_permission(false, &granted, "GET", "/v0/admin/proxies"));
        // 模板不同就是不同权限，不做前缀匹配
        assert!(!has_permission(false, &granted, "GET", "/v0/admin/proxies/:id"));
        assert!(!has_permission(false, &granted, "POST", "/v0/admin/proxies"));
    }

    #[test]
    fn test_super_admin_bypasses() {
        assert!(has_permission(true, &[], "DELETE", "/v0/admin/admins/:id"));
    }
}
