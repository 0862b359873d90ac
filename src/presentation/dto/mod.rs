//! 数据传输对象

pub mod batch;
pub mod quota;

pub use batch::{BatchBindProxiesRequest, BatchSetGroupsRequest};
pub use quota::QuotaView;
