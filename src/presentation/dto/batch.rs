//! 批量操作请求DTO

use serde::Deserialize;

/// 批量轮询绑定代理
///
/// `proxy_ids` 为空时使用代理池全量代理
#[derive(Debug, Deserialize)]
pub struct BatchBindProxiesRequest {
    pub ids: Vec<i64>,
    #[serde(default)]
    pub proxy_ids: Vec<i64>,
}

/// 批量设置凭据分组
#[derive(Debug, Deserialize)]
pub struct BatchSetGroupsRequest {
    pub ids: Vec<i64>,
    pub auth_group_ids: Vec<i64>,
}
