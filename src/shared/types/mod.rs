//! 共享类型定义模块

use serde::{Deserialize, Serialize};

/// 管理员ID类型
pub type AdminId = i64;

/// 凭据文件ID类型
pub type AuthFileId = i64;

/// 凭据分组ID类型
pub type AuthGroupId = i64;

/// 代理ID类型
pub type ProxyId = i64;

/// 页码类型
pub type PageNumber = u32;

/// 页面大小类型
pub type PageSize = u32;

/// 分页参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: PageNumber,
    #[serde(default = "default_size")]
    pub size: PageSize,
}

fn default_page() -> PageNumber {
    1
}

fn default_size() -> PageSize {
    crate::shared::constants::pagination::DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            size: crate::shared::constants::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// 计算偏移量
    ///
    /// 先转i64再乘，page接近u32上限时不会溢出
    pub fn offset(&self) -> i64 {
        (self.page.max(1) as i64 - 1) * self.size as i64
    }

    /// 计算限制数量
    pub fn limit(&self) -> i64 {
        self.size as i64
    }

    /// 验证分页参数
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("页码必须大于0".to_string());
        }
        if self.size == 0 || self.size > crate::shared::constants::pagination::MAX_PAGE_SIZE {
            return Err("页面大小必须在1-100之间".to_string());
        }
        Ok(())
    }
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// 分页信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: PageNumber,
    pub page_size: PageSize,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    pub fn new(current_page: PageNumber, page_size: PageSize, total_count: u64) -> Self {
        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;
        let has_next = current_page < total_pages;
        let has_prev = current_page > 1;

        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_next,
            has_prev,
        }
    }
}

/// API响应包装器
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset() {
        let params = PaginationParams { page: 3, size: 20 };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_pagination_offset_huge_page() {
        let params = PaginationParams { page: u32::MAX, size: 100 };
        assert_eq!(params.offset(), (u32::MAX as i64 - 1) * 100);
    }

    #[test]
    fn test_pagination_validate() {
        assert!(PaginationParams { page: 0, size: 20 }.validate().is_err());
        assert!(PaginationParams { page: 1, size: 0 }.validate().is_err());
        assert!(PaginationParams { page: 1, size: 200 }.validate().is_err());
        assert!(PaginationParams { page: 1, size: 20 }.validate().is_ok());
    }

    #[test]
    fn test_pagination_info() {
        let info = PaginationInfo::new(2, 10, 25);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);
    }
}
