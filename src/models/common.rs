use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::constants::DEFAULT_VALUES;

/// ApiResponse
///
/// Uniform JSON envelope for every endpoint: `success` is always present, `data` on
/// success, `error` (and optionally `message`) on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: None,
            success: true,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            message: None,
            success: false,
        }
    }
}

/// Pagination
///
/// Page window echoed back with list responses. `limit` is clamped to the configured
/// maximum and `page` is 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>, total: u64) -> Self {
        let defaults = DEFAULT_VALUES.pagination;
        let page = page.unwrap_or(defaults.page).max(1);
        let limit = limit.unwrap_or(defaults.limit).clamp(1, defaults.max_limit);
        let total_pages = total.div_ceil(u64::from(limit));

        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Zero-based index of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// PaginatedResponse
///
/// `ApiResponse` over a list, plus the page window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    #[serde(flatten)]
    pub response: ApiResponse<Vec<T>>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            response: ApiResponse::ok(items),
            pagination,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
    Pending,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq, PartialOrd, Ord)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let page = Pagination::new(None, None, 25);
        assert_eq!((page.page, page.limit, page.total_pages), (1, 10, 3));

        let page = Pagination::new(Some(0), Some(1000), 250);
        assert_eq!((page.page, page.limit, page.total_pages), (1, 100, 3));

        let page = Pagination::new(Some(3), Some(20), 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom", "success": false }));
    }

    #[test]
    fn paginated_response_is_flat() {
        let response = PaginatedResponse::new(vec![1, 2], Pagination::new(None, None, 2));
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["pagination"]["totalPages"], 1);
    }
}
