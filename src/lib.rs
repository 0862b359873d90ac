//! Proxy Admin Console 服务
//!
//! 网关管理端的纯Rust实现，基于三层架构设计

// 核心模块
pub mod shared;          // 共享模块（错误处理、类型定义、工具函数）
pub mod infrastructure;  // 基础设施层（数据库、配置）
pub mod business;        // 业务逻辑层（领域模型、配额解析、批量执行）
pub mod presentation;    // 表示层（HTTP处理、路由、中间件）
pub mod auth;            // 认证和授权模块

// 重新导出核心类型
pub use infrastructure::{Config, Database};
pub use presentation::routes::create_routes;
pub use shared::{AppError, AppResult};
