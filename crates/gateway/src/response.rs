//! Uniform API response envelope

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success envelope: `{success, data, message}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data and message
    pub fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        })
    }

    /// 201 Created with data and message
    pub fn created(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                success: true,
                data: Some(data),
                message: Some(message.into()),
            }),
        )
    }
}

/// Paginated listing payload
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            items,
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Common pagination query parameters
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// Resolve to (page, limit, offset) with the usual clamps
    pub fn resolve(&self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamps() {
        let (page, limit, offset) = PaginationParams { page: None, limit: None }.resolve();
        assert_eq!((page, limit, offset), (1, 10, 0));

        let (page, limit, offset) = PaginationParams { page: Some(3), limit: Some(500) }.resolve();
        assert_eq!((page, limit, offset), (3, 100, 200));

        let (page, _, offset) = PaginationParams { page: Some(0), limit: Some(10) }.resolve();
        assert_eq!((page, offset), (1, 0));
    }

    #[test]
    fn test_total_pages() {
        let paginated = Paginated::new(vec![1, 2, 3], 1, 10, 23);
        assert_eq!(paginated.total_pages, 3);
    }
}
