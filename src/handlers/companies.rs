//! # Companies API Handlers
//!
//! CRUD endpoints for companies. Create and update accept a `logo` image upload
//! through multipart bodies.

use axum::{
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};

use crate::error::{ApiError, RepositoryError};
use crate::handlers::form::FormInput;
use crate::handlers::types::{CompanyResource, ListQuery, PaginatedResponse};
use crate::server::AppState;
use crate::validation::company as rules;

const COLLECTION_PATH: &str = "/api/companies";

/// Lists companies one page at a time, ordered by id
#[utoipa::path(
    get,
    path = "/api/companies",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of companies", body = PaginatedResponse<CompanyResource>),
        (status = 400, description = "Invalid query parameters", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<CompanyResource>>, ApiError> {
    let Query(query) = query?;
    let page = state
        .companies
        .get_all(query.page_request(state.config.page_size)?)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page, COLLECTION_PATH)))
}

/// Creates a company, storing an uploaded logo first
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body(
        description = "Company attributes as JSON, urlencoded form, or multipart (with a `logo` file)",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 201, description = "Company created", body = CompanyResource),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<CompanyResource>), ApiError> {
    let (attributes, stored_logo) =
        rules::prepare_create(&input, state.assets.as_ref(), state.config.max_upload_bytes())
            .await?;

    let company = match state.companies.create(attributes).await {
        Ok(company) => company,
        Err(error) => {
            rules::discard_logo(stored_logo, state.assets.as_ref()).await;
            return Err(error.into());
        }
    };

    Ok((StatusCode::CREATED, Json(company.into())))
}

/// Fetches a single company
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company found", body = CompanyResource),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn show_company(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CompanyResource>, ApiError> {
    let Path(id) = id?;
    let company = state
        .companies
        .get_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Company", id))?;

    Ok(Json(company.into()))
}

/// Updates the supplied attributes of a company
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    request_body(
        description = "Attributes to change as JSON, urlencoded form, or multipart (with a `logo` file)",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Company updated", body = CompanyResource),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    FormInput(input): FormInput,
) -> Result<Json<CompanyResource>, ApiError> {
    let Path(id) = id?;
    let validated = rules::validate_update(&input, state.config.max_upload_bytes())?;

    // Avoid storing an upload for a company that does not exist
    if validated.logo_upload.is_some() && state.companies.get_by_id(id).await?.is_none() {
        return Err(RepositoryError::not_found("Company", id).into());
    }

    let (changes, stored_logo) =
        rules::store_update_logo(validated, state.assets.as_ref()).await?;
    let company = match state.companies.update(id, changes).await {
        Ok(company) => company,
        Err(error) => {
            rules::discard_logo(stored_logo, state.assets.as_ref()).await;
            return Err(error.into());
        }
    };

    Ok(Json(company.into()))
}

/// Deletes a company and its employees
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.companies.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
