//! 表示层模块
//!
//! HTTP处理器、DTO和路由配置

pub mod dto;
pub mod handlers;
pub mod routes;
