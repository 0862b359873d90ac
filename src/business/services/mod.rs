//! 业务服务模块

pub mod batch;

pub use batch::{round_robin_assign, run_batch, BatchFailure, BatchReport};
