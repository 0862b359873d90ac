//! 配额快照展示DTO

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::business::domain::QuotaRecord;
use crate::business::quota::{normalize_quota_payload, QuotaItem};
use crate::shared::constants::auth_file;

/// 配额快照的统一展示形态
///
/// 原始JSON在后端就地解析成统一条目，前端不再做形态嗅探。
#[derive(Debug, Serialize)]
pub struct QuotaView {
    pub id: i64,
    pub auth_id: i64,
    pub auth_type: String,
    pub auth_type_label: String,
    pub items: Vec<QuotaItem>,
    pub updated_at: DateTime<Utc>,
}

impl QuotaView {
    pub fn from_record(record: QuotaRecord) -> Self {
        let items = normalize_quota_payload(&record.data, record.updated_at);

        Self {
            id: record.id,
            auth_id: record.auth_id,
            auth_type_label: auth_file::type_label(&record.auth_type).to_string(),
            auth_type: record.auth_type,
            items,
            updated_at: record.updated_at,
        }
    }
}
