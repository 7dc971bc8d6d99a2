//! The `{success, message, data, pagination}` envelope every endpoint wraps its payload in.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Fails with [`ApiError::Rejected`] when the backend reported `success: false`.
    pub fn ensure_success(self) -> ApiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
            })
        }
    }

    /// Unwraps a successful envelope into its payload.
    pub fn into_data(self, what: &'static str) -> ApiResult<T> {
        self.ensure_success()?
            .data
            .ok_or_else(|| ApiError::decode(what, "response carried no data"))
    }

    /// Like [`ApiResponse::into_data`], keeping the pagination block.
    pub fn into_page(self, what: &'static str) -> ApiResult<(T, Option<Pagination>)> {
        let response = self.ensure_success()?;
        let pagination = response.pagination;
        let data = response
            .data
            .ok_or_else(|| ApiError::decode(what, "response carried no data"))?;
        Ok((data, pagination))
    }
}
