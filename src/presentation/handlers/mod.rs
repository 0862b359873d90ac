//! HTTP请求处理器模块

pub mod admins;
pub mod auth;
pub mod auth_files;
pub mod auth_groups;
pub mod billing_rules;
pub mod dashboard;
pub mod health;
pub mod logs;
pub mod model_references;
pub mod plans;
pub mod proxies;
pub mod quotas;
