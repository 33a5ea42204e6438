use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Number of records to return (default: 10, max: 100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be a positive number"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: i64,

    /// Number of records to skip (default: 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be less than 0"))]
    #[param(minimum = 0, example = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PaginationQuery {
    /// SQL OFFSET, never negative
    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// SQL LIMIT, clamped to MAX_PAGE_SIZE
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 0);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_pagination_clamps_large_limit() {
        let q = PaginationQuery {
            limit: 5000,
            offset: 20,
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn test_pagination_rejects_non_positive_limit_and_negative_offset() {
        assert!(PaginationQuery {
            limit: 0,
            offset: 0
        }
        .validate()
        .is_err());
        assert!(PaginationQuery {
            limit: 10,
            offset: -1
        }
        .validate()
        .is_err());
    }
}
