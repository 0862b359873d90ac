//! 凭据文件管理处理器
//!
//! CRUD、批量导入、批量绑定代理、批量设置分组、OAuth回调解析

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::auth::oauth::{parse_oauth_callback_url, OAuthCallbackParams};
use crate::business::domain::{parse_proxy_url, AuthFile};
use crate::business::services::{round_robin_assign, run_batch, BatchReport};
use crate::infrastructure::database::auth_file_repository::{AuthFileDraft, AuthFileFilter};
use crate::presentation::dto::{BatchBindProxiesRequest, BatchSetGroupsRequest};
use crate::presentation::routes::AppState;
use crate::shared::constants::auth_file;
use crate::shared::utils::coerce_non_negative_i32;
use crate::shared::{ApiResponse, AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};
use crate::validation_error;

/// 凭据文件列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListAuthFilesQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub auth_group_id: Option<i64>,
    pub auth_type: Option<String>,
    pub is_available: Option<bool>,
    pub keyword: Option<String>,
}

/// 创建/更新凭据文件请求
///
/// 数字字段允许以字符串提交，解析失败回退为0
#[derive(Debug, Deserialize)]
pub struct AuthFileRequest {
    pub key: String,
    pub auth_type: String,
    #[serde(default)]
    pub auth_group_ids: Vec<i64>,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub rate_limit: Value,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub content: Value,
}

fn default_available() -> bool {
    true
}

/// OAuth回调解析请求
#[derive(Debug, Deserialize)]
pub struct ParseCallbackRequest {
    pub input: String,
}

impl AuthFileRequest {
    fn into_draft(self) -> AppResult<AuthFileDraft> {
        if self.key.trim().is_empty() {
            return Err(validation_error!("凭据名称不能为空"));
        }
        if !auth_file::is_known_type(&self.auth_type) {
            return Err(validation_error!("未知的凭据类型: {}", self.auth_type));
        }

        let proxy_url = match self.proxy_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => {
                parse_proxy_url(url).ok_or_else(|| validation_error!("代理地址无效: {}", url))?;
                Some(url.to_string())
            }
        };

        Ok(AuthFileDraft {
            key: self.key.trim().to_string(),
            auth_type: self.auth_type,
            auth_group_ids: self.auth_group_ids,
            proxy_url,
            priority: coerce_non_negative_i32(&self.priority),
            rate_limit: coerce_non_negative_i32(&self.rate_limit),
            is_available: self.is_available,
            content: self.content,
        })
    }
}

/// 获取凭据文件列表
#[instrument(skip(state))]
pub async fn list_auth_files(
    State(state): State<AppState>,
    Query(query): Query<ListAuthFilesQuery>,
) -> AppResult<Json<PaginatedResponse<AuthFile>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let filter = AuthFileFilter {
        auth_group_id: query.auth_group_id,
        auth_type: query.auth_type,
        is_available: query.is_available,
        keyword: query.keyword,
    };

    let (rows, total) = state
        .database
        .auth_files
        .list(&filter, pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(PaginatedResponse {
        data: rows,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 获取单个凭据文件
#[instrument(skip(state))]
pub async fn get_auth_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthFile>> {
    let auth_file = state
        .database
        .auth_files
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("凭据文件不存在: {}", id)))?;

    Ok(Json(auth_file))
}

/// 创建凭据文件
#[instrument(skip(state, request))]
pub async fn create_auth_file(
    State(state): State<AppState>,
    Json(request): Json<AuthFileRequest>,
) -> AppResult<Json<AuthFile>> {
    let draft = request.into_draft()?;
    let created = state.database.auth_files.create(&draft).await?;

    // 以库里的最终状态为准返回
    let auth_file = state
        .database
        .auth_files
        .get_by_id(created.id)
        .await?
        .ok_or_else(|| AppError::Internal("创建后读取凭据文件失败".to_string()))?;

    Ok(Json(auth_file))
}

/// 更新凭据文件
#[instrument(skip(state, request))]
pub async fn update_auth_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AuthFileRequest>,
) -> AppResult<Json<AuthFile>> {
    let draft = request.into_draft()?;
    state
        .database
        .auth_files
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("凭据文件不存在: {}", id)))?;

    let auth_file = state
        .database
        .auth_files
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::Internal("更新后读取凭据文件失败".to_string()))?;

    Ok(Json(auth_file))
}

/// 删除凭据文件
#[instrument(skip(state))]
pub async fn delete_auth_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = state.database.auth_files.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("凭据文件不存在: {}", id)));
    }

    info!("凭据文件已删除 (ID: {})", id);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

/// 批量导入JSON凭据文件（multipart）
///
/// 每个文件部分独立导入，key取文件名去掉 `.json` 后缀，
/// `auth_type` 文本字段对整批生效。
#[instrument(skip(state, multipart))]
pub async fn import_auth_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<BatchReport>> {
    let mut auth_type = String::new();
    let mut entries: Vec<(String, Value)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation_error!("读取multipart失败: {}", e))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "auth_type" {
            auth_type = field
                .text()
                .await
                .map_err(|e| validation_error!("读取auth_type字段失败: {}", e))?;
            continue;
        }

        let file_name = field
            .file_name()
            .unwrap_or("credential.json")
            .trim_end_matches(".json")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| validation_error!("读取文件 {} 失败: {}", file_name, e))?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(content) => entries.push((file_name, content)),
            Err(e) => {
                warn!("文件 {} 不是有效JSON: {}", file_name, e);
                entries.push((file_name, Value::Null));
            }
        }
    }

    if !auth_file::is_known_type(&auth_type) {
        return Err(validation_error!("未知的凭据类型: {}", auth_type));
    }
    if entries.is_empty() {
        return Err(validation_error!("没有可导入的文件"));
    }

    let database = state.database.clone();
    let items = entries
        .into_iter()
        .map(|(key, content)| (key.clone(), (key, content)))
        .collect();

    let report = run_batch(items, |(key, content): (String, Value)| {
        let database = database.clone();
        let auth_type = auth_type.clone();
        async move {
            if content.is_null() {
                return Err(validation_error!("不是有效的JSON文件"));
            }
            let draft = AuthFileDraft {
                key,
                auth_type,
                auth_group_ids: Vec::new(),
                proxy_url: None,
                priority: 0,
                rate_limit: 0,
                is_available: true,
                content,
            };
            database.auth_files.create(&draft).await?;
            Ok(())
        }
    })
    .await;

    info!(
        "📋 批量导入完成: 共{} 成功{} 失败{}",
        report.total, report.succeeded, report.failed
    );
    Ok(Json(report))
}

/// 批量轮询绑定代理
///
/// 第 i 个选中的凭据绑定 `pool[i % M]`；代理池为空时报错。
#[instrument(skip(state, request))]
pub async fn batch_bind_proxies(
    State(state): State<AppState>,
    Json(request): Json<BatchBindProxiesRequest>,
) -> AppResult<Json<BatchReport>> {
    if request.ids.is_empty() {
        return Err(validation_error!("未选中任何凭据文件"));
    }

    let mut proxies = state.database.proxies.list_all().await?;
    if !request.proxy_ids.is_empty() {
        proxies.retain(|proxy| request.proxy_ids.contains(&proxy.id));
    }
    if proxies.is_empty() {
        return Err(validation_error!("代理池为空，无法绑定"));
    }

    let pool: Vec<String> = proxies.into_iter().map(|proxy| proxy.proxy_url).collect();
    let assignments = round_robin_assign(&request.ids, &pool);

    let database = state.database.clone();
    let items = assignments
        .into_iter()
        .map(|(id, proxy_url)| (id.to_string(), (id, proxy_url)))
        .collect();

    let report = run_batch(items, |(id, proxy_url): (i64, String)| {
        let database = database.clone();
        async move {
            let updated = database.auth_files.set_proxy(id, Some(&proxy_url)).await?;
            if !updated {
                return Err(AppError::NotFound(format!("凭据文件不存在: {}", id)));
            }
            Ok(())
        }
    })
    .await;

    info!(
        "📋 批量绑定代理完成: 共{} 成功{} 失败{}",
        report.total, report.succeeded, report.failed
    );
    Ok(Json(report))
}

/// 批量设置凭据分组
#[instrument(skip(state, request))]
pub async fn batch_set_groups(
    State(state): State<AppState>,
    Json(request): Json<BatchSetGroupsRequest>,
) -> AppResult<Json<BatchReport>> {
    if request.ids.is_empty() {
        return Err(validation_error!("未选中任何凭据文件"));
    }

    let database = state.database.clone();
    let group_ids = request.auth_group_ids.clone();
    let items = request
        .ids
        .into_iter()
        .map(|id| (id.to_string(), id))
        .collect();

    let report = run_batch(items, |id: i64| {
        let database = database.clone();
        let group_ids = group_ids.clone();
        async move {
            let updated = database.auth_files.set_groups(id, &group_ids).await?;
            if !updated {
                return Err(AppError::NotFound(format!("凭据文件不存在: {}", id)));
            }
            Ok(())
        }
    })
    .await;

    info!(
        "📋 批量设置分组完成: 共{} 成功{} 失败{}",
        report.total, report.succeeded, report.failed
    );
    Ok(Json(report))
}

/// 解析粘贴的OAuth回调字符串
///
/// 解析不出来返回 `null`，与界面端语义一致。
#[instrument(skip(request))]
pub async fn parse_callback(
    Json(request): Json<ParseCallbackRequest>,
) -> AppResult<Json<Option<OAuthCallbackParams>>> {
    Ok(Json(parse_oauth_callback_url(&request.input)))
}
