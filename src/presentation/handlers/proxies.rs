//! 代理节点管理处理器

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::business::domain::{assemble_proxy_url, parse_proxy_url, Proxy, ProxyEndpoint};
use crate::business::services::{run_batch, BatchReport};
use crate::presentation::routes::AppState;
use crate::shared::utils::split_lines;
use crate::shared::{ApiResponse, AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};
use crate::validation_error;

/// 代理列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListProxiesQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 创建/更新代理请求
///
/// 既接受完整URL，也接受编辑表单分字段提交的形态。
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub endpoint: Option<ProxyEndpoint>,
}

impl ProxyRequest {
    fn resolve_url(&self) -> AppResult<String> {
        if let Some(url) = self
            .proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            return validate_proxy_url(url);
        }
        match &self.endpoint {
            Some(endpoint) => assemble_proxy_url(endpoint).map_err(AppError::Validation),
            None => Err(validation_error!("缺少代理地址")),
        }
    }
}

/// 批量添加代理请求（换行分隔的地址）
#[derive(Debug, Deserialize)]
pub struct BatchAddProxiesRequest {
    pub urls: String,
}

fn validate_proxy_url(url: &str) -> AppResult<String> {
    let url = url.trim();
    parse_proxy_url(url).ok_or_else(|| validation_error!("代理地址无效: {}", url))?;
    Ok(url.to_string())
}

/// 获取代理列表
#[instrument(skip(state))]
pub async fn list_proxies(
    State(state): State<AppState>,
    Query(query): Query<ListProxiesQuery>,
) -> AppResult<Json<PaginatedResponse<Proxy>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let (rows, total) = state
        .database
        .proxies
        .list(pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(PaginatedResponse {
        data: rows,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 创建代理
#[instrument(skip(state, request))]
pub async fn create_proxy(
    State(state): State<AppState>,
    Json(request): Json<ProxyRequest>,
) -> AppResult<Json<Proxy>> {
    let proxy_url = request.resolve_url()?;
    let proxy = state.database.proxies.create(&proxy_url).await?;

    Ok(Json(proxy))
}

/// 更新代理
#[instrument(skip(state, request))]
pub async fn update_proxy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ProxyRequest>,
) -> AppResult<Json<Proxy>> {
    let proxy_url = request.resolve_url()?;
    let proxy = state
        .database
        .proxies
        .update(id, &proxy_url)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("代理不存在: {}", id)))?;

    Ok(Json(proxy))
}

/// 删除代理
#[instrument(skip(state))]
pub async fn delete_proxy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = state.database.proxies.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("代理不存在: {}", id)));
    }

    info!("代理已删除 (ID: {})", id);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

/// 批量添加代理
///
/// 每行一个地址，空行忽略；每行独立创建，部分失败不回滚。
#[instrument(skip(state, request))]
pub async fn batch_add_proxies(
    State(state): State<AppState>,
    Json(request): Json<BatchAddProxiesRequest>,
) -> AppResult<Json<BatchReport>> {
    let urls = split_lines(&request.urls);
    if urls.is_empty() {
        return Err(validation_error!("没有可添加的代理地址"));
    }

    let database = state.database.clone();
    let items = urls
        .into_iter()
        .map(|url| (url.clone(), url))
        .collect();

    let report = run_batch(items, |url: String| {
        let database = database.clone();
        async move {
            let proxy_url = validate_proxy_url(&url)?;
            database.proxies.create(&proxy_url).await?;
            Ok(())
        }
    })
    .await;

    info!(
        "📋 批量添加代理完成: 共{} 成功{} 失败{}",
        report.total, report.succeeded, report.failed
    );
    Ok(Json(report))
}
