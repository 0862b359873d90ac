//! 路由配置模块
//!
//! 组织和配置所有HTTP路由

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::middleware::admin_auth_middleware;
use crate::infrastructure::{Config, Database};
use crate::presentation::handlers;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Arc<Config>,
}

/// 创建应用路由
pub fn create_routes(database: Database, config: Arc<Config>) -> Router {
    let state = AppState { database, config };

    // 公开路由
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/v0/admin/auth/login", post(handlers::auth::login));

    // 管理端路由，全部走JWT认证加权限复查
    let admin_routes = Router::new()
        .route("/v0/admin/auth/profile", get(handlers::auth::profile))

        // 凭据文件管理
        .route("/v0/admin/auth-files", get(handlers::auth_files::list_auth_files))
        .route("/v0/admin/auth-files", post(handlers::auth_files::create_auth_file))
        .route("/v0/admin/auth-files/:id", get(handlers::auth_files::get_auth_file))
        .route("/v0/admin/auth-files/:id", put(handlers::auth_files::update_auth_file))
        .route("/v0/admin/auth-files/:id", delete(handlers::auth_files::delete_auth_file))
        .route("/v0/admin/auth-files/:id/quota", get(handlers::quotas::get_auth_file_quota))
        .route("/v0/admin/auth-files/import", post(handlers::auth_files::import_auth_files))
        .route("/v0/admin/auth-files/batch-bind-proxies", post(handlers::auth_files::batch_bind_proxies))
        .route("/v0/admin/auth-files/batch-set-groups", post(handlers::auth_files::batch_set_groups))
        .route("/v0/admin/auth-files/parse-callback", post(handlers::auth_files::parse_callback))

        // 代理节点管理
        .route("/v0/admin/proxies", get(handlers::proxies::list_proxies))
        .route("/v0/admin/proxies", post(handlers::proxies::create_proxy))
        .route("/v0/admin/proxies/:id", put(handlers::proxies::update_proxy))
        .route("/v0/admin/proxies/:id", delete(handlers::proxies::delete_proxy))
        .route("/v0/admin/proxies/batch", post(handlers::proxies::batch_add_proxies))

        // 凭据分组管理
        .route("/v0/admin/auth-groups", get(handlers::auth_groups::list_auth_groups))
        .route("/v0/admin/auth-groups", post(handlers::auth_groups::create_auth_group))
        .route("/v0/admin/auth-groups/:id", put(handlers::auth_groups::update_auth_group))
        .route("/v0/admin/auth-groups/:id", delete(handlers::auth_groups::delete_auth_group))
        .route("/v0/admin/auth-groups/:id/set-default", post(handlers::auth_groups::set_default_auth_group))

        // 订阅套餐管理
        .route("/v0/admin/plans", get(handlers::plans::list_plans))
        .route("/v0/admin/plans", post(handlers::plans::create_plan))
        .route("/v0/admin/plans/:id", get(handlers::plans::get_plan))
        .route("/v0/admin/plans/:id", put(handlers::plans::update_plan))
        .route("/v0/admin/plans/:id", delete(handlers::plans::delete_plan))
        .route("/v0/admin/plans/:id/set-enabled", post(handlers::plans::set_plan_enabled))

        // 计费规则管理
        .route("/v0/admin/billing-rules", get(handlers::billing_rules::list_billing_rules))
        .route("/v0/admin/billing-rules", post(handlers::billing_rules::create_billing_rule))
        .route("/v0/admin/billing-rules/:id", put(handlers::billing_rules::update_billing_rule))
        .route("/v0/admin/billing-rules/:id", delete(handlers::billing_rules::delete_billing_rule))

        // 管理员账号管理
        .route("/v0/admin/admins", get(handlers::admins::list_admins))
        .route("/v0/admin/admins", post(handlers::admins::create_admin))
        .route("/v0/admin/admins/:id", put(handlers::admins::update_admin))
        .route("/v0/admin/admins/:id", delete(handlers::admins::delete_admin))
        .route("/v0/admin/admins/:id/reset-password", post(handlers::admins::reset_admin_password))

        // 请求日志
        .route("/v0/admin/logs", get(handlers::logs::list_logs))
        .route("/v0/admin/logs/purge", post(handlers::logs::purge_logs))

        // 配额快照
        .route("/v0/admin/quotas", get(handlers::quotas::list_quotas))
        .route("/v0/admin/quotas/:id", get(handlers::quotas::get_quota))

        // 总览与模型目录
        .route("/v0/admin/dashboard/overview", get(handlers::dashboard::overview))
        .route("/v0/admin/model-references", get(handlers::model_references::list_model_references))

        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
