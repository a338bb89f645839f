//! # Common API Types
//!
//! This module contains shared types used across multiple API handlers,
//! including resource representations and pagination utilities.

use axum::http::StatusCode;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::{CompanySummary, company, employee};
use crate::repositories::pagination::MAX_PAGE;
use crate::repositories::{EmployeeWithCompany, Page, PageRequest};

/// Query parameters for paginated listings
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct ListQuery {
    /// 1-based page number (default: 1)
    pub page: Option<u64>,
    /// Records per page (default: configured page size, max: 100)
    pub per_page: Option<u64>,
}

impl ListQuery {
    /// Rejects page numbers past [`MAX_PAGE`] instead of silently capping them
    pub fn page_request(&self, default_per_page: u64) -> Result<PageRequest, ApiError> {
        if self.page.is_some_and(|page| page > MAX_PAGE) {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Page number is out of range",
            ));
        }

        Ok(PageRequest::new(self.page, self.per_page, default_per_page))
    }
}

/// Generic paginated response wrapper for list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Records on the current page
    pub data: Vec<T>,
    /// 1-based page number
    pub current_page: u64,
    pub per_page: u64,
    /// Total number of records across all pages
    pub total: u64,
    pub last_page: u64,
    /// 1-based position of the first record on this page (null when empty)
    pub from: Option<u64>,
    /// 1-based position of the last record on this page (null when empty)
    pub to: Option<u64>,
    /// Link to the following page (null on the last page)
    pub next_page_url: Option<String>,
    /// Link to the preceding page (null on the first page)
    pub prev_page_url: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Build a response from a repository page, linking pages relative to `path`.
    pub fn from_page<M>(page: Page<M>, path: &str) -> Self
    where
        T: From<M>,
    {
        let link = |number: u64| format!("{path}?page={number}&per_page={}", page.per_page);

        let next_page_url = page
            .has_more_pages()
            .then(|| link(page.current_page + 1));
        let prev_page_url = (page.current_page > 1).then(|| link(page.current_page - 1));

        Self {
            current_page: page.current_page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page,
            from: page.from,
            to: page.to,
            next_page_url,
            prev_page_url,
            data: page.data.into_iter().map(T::from).collect(),
        }
    }
}

/// Company representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResource {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Public URL of the company logo
    pub logo: Option<String>,
    pub website: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl From<company::Model> for CompanyResource {
    fn from(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            logo: model.logo,
            website: model.website,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Employee representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResource {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub email: String,
    /// Owning company's id and name, present on listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl From<employee::Model> for EmployeeResource {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            name: model.name,
            email: model.email,
            company: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<EmployeeWithCompany> for EmployeeResource {
    fn from(row: EmployeeWithCompany) -> Self {
        Self {
            company: row.company,
            ..Self::from(row.employee)
        }
    }
}
