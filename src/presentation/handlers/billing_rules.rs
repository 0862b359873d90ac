//! 计费规则管理处理器
//!
//! `billing_type` 决定互斥的价格字段集合：
//! 1 按次计费只保留单次价格，2 按token计费只保留四个token价格。

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::business::domain::{BillingRule, BillingType};
use crate::infrastructure::database::billing_rule_repository::{
    BillingRuleDraft, BillingRuleFilter,
};
use crate::presentation::routes::AppState;
use crate::shared::utils::coerce_number_or_zero;
use crate::shared::{ApiResponse, AppError, AppResult, PaginatedResponse, PaginationInfo, PaginationParams};
use crate::validation_error;

/// 计费规则列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListBillingRulesQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub auth_group_id: Option<i64>,
    pub user_group_id: Option<i64>,
    pub provider: Option<String>,
}

/// 创建/更新计费规则请求
#[derive(Debug, Deserialize)]
pub struct BillingRuleRequest {
    pub auth_group_id: i64,
    pub user_group_id: i64,
    pub provider: String,
    pub model: String,
    pub billing_type: i16,
    #[serde(default)]
    pub price_per_request: Value,
    #[serde(default)]
    pub input_token_price: Value,
    #[serde(default)]
    pub output_token_price: Value,
    #[serde(default)]
    pub cache_read_token_price: Value,
    #[serde(default)]
    pub cache_write_token_price: Value,
}

fn optional_price(value: &Value) -> Option<f64> {
    if value.is_null() {
        None
    } else {
        Some(coerce_number_or_zero(value))
    }
}

impl BillingRuleRequest {
    fn into_draft(self) -> AppResult<BillingRuleDraft> {
        if self.provider.trim().is_empty() || self.model.trim().is_empty() {
            return Err(validation_error!("提供商和模型不能为空"));
        }

        let billing_type = BillingType::try_from(self.billing_type)
            .map_err(AppError::Validation)?;

        // 互斥字段：与计费方式无关的价格强制清空
        let (price_per_request, token_prices) = match billing_type {
            BillingType::PerRequest => {
                let price = optional_price(&self.price_per_request)
                    .ok_or_else(|| validation_error!("按次计费必须填写单次价格"))?;
                (Some(price), (None, None, None, None))
            }
            BillingType::PerToken => (
                None,
                (
                    optional_price(&self.input_token_price),
                    optional_price(&self.output_token_price),
                    optional_price(&self.cache_read_token_price),
                    optional_price(&self.cache_write_token_price),
                ),
            ),
        };

        Ok(BillingRuleDraft {
            auth_group_id: self.auth_group_id,
            user_group_id: self.user_group_id,
            provider: self.provider.trim().to_string(),
            model: self.model.trim().to_string(),
            billing_type: billing_type.into(),
            price_per_request,
            input_token_price: token_prices.0,
            output_token_price: token_prices.1,
            cache_read_token_price: token_prices.2,
            cache_write_token_price: token_prices.3,
        })
    }
}

/// 获取计费规则列表
#[instrument(skip(state))]
pub async fn list_billing_rules(
    State(state): State<AppState>,
    Query(query): Query<ListBillingRulesQuery>,
) -> AppResult<Json<PaginatedResponse<BillingRule>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        size: query.size.unwrap_or(crate::shared::constants::pagination::DEFAULT_PAGE_SIZE),
    };
    pagination.validate().map_err(AppError::Validation)?;

    let filter = BillingRuleFilter {
        auth_group_id: query.auth_group_id,
        user_group_id: query.user_group_id,
        provider: query.provider,
    };

    let (rows, total) = state
        .database
        .billing_rules
        .list(&filter, pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(PaginatedResponse {
        data: rows,
        pagination: PaginationInfo::new(pagination.page, pagination.size, total as u64),
    }))
}

/// 创建计费规则
#[instrument(skip(state, request))]
pub async fn create_billing_rule(
    State(state): State<AppState>,
    Json(request): Json<BillingRuleRequest>,
) -> AppResult<Json<BillingRule>> {
    let draft = request.into_draft()?;
    let rule = state.database.billing_rules.create(&draft).await?;

    Ok(Json(rule))
}

/// 更新计费规则
#[instrument(skip(state, request))]
pub async fn update_billing_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<BillingRuleRequest>,
) -> AppResult<Json<BillingRule>> {
    let draft = request.into_draft()?;
    let rule = state
        .database
        .billing_rules
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("计费规则不存在: {}", id)))?;

    Ok(Json(rule))
}

/// 删除计费规则
#[instrument(skip(state))]
pub async fn delete_billing_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = state.database.billing_rules.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("计费规则不存在: {}", id)));
    }

    info!("计费规则已删除 (ID: {})", id);
    Ok(Json(ApiResponse::success_with_message((), "删除成功".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(billing_type: i16) -> BillingRuleRequest {
        BillingRuleRequest {
            auth_group_id: 1,
            user_group_id: 2,
            provider: "gemini".to_string(),
            model: "gemini-2.5-pro".to_string(),
            billing_type,
            price_per_request: Value::Null,
            input_token_price: Value::Null,
            output_token_price: Value::Null,
            cache_read_token_price: Value::Null,
            cache_write_token_price: Value::Null,
        }
    }

    #[test]
    fn test_per_request_clears_token_prices() {
        let mut req = request(1);
        req.price_per_request = json!(0.02);
        req.input_token_price = json!(1.5);
        req.output_token_price = json!("3.0");
        req.cache_read_token_price = json!(0.1);

        let draft = req.into_draft().unwrap();
        assert_eq!(draft.price_per_request, Some(0.02));
        assert_eq!(draft.input_token_price, None);
        assert_eq!(draft.output_token_price, None);
        assert_eq!(draft.cache_read_token_price, None);
        assert_eq!(draft.cache_write_token_price, None);
    }

    #[test]
    fn test_per_token_clears_request_price() {
        let mut req = request(2);
        req.price_per_request = json!(0.02);
        req.input_token_price = json!(1.5);
        req.output_token_price = json!("6");

        let draft = req.into_draft().unwrap();
        assert_eq!(draft.price_per_request, None);
        assert_eq!(draft.input_token_price, Some(1.5));
        assert_eq!(draft.output_token_price, Some(6.0));
        // 没填的token价格保持为空，不补0
        assert_eq!(draft.cache_read_token_price, None);
        assert_eq!(draft.cache_write_token_price, None);
    }

    #[test]
    fn test_per_request_requires_price() {
        let req = request(1);
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn test_unknown_billing_type_rejected() {
        let req = request(3);
        assert!(req.into_draft().is_err());
    }
}
