//! # Employees API Handlers
//!
//! CRUD endpoints for employees. Listings embed each employee's company id and name.

use axum::{
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};

use crate::error::{ApiError, RepositoryError};
use crate::handlers::form::FormInput;
use crate::handlers::types::{EmployeeResource, ListQuery, PaginatedResponse};
use crate::server::AppState;
use crate::validation::employee as rules;

const COLLECTION_PATH: &str = "/api/employees";

/// Lists employees one page at a time with their company
#[utoipa::path(
    get,
    path = "/api/employees",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of employees", body = PaginatedResponse<EmployeeResource>, example = json!({
            "data": [
                {
                    "id": 1,
                    "company_id": 1,
                    "name": "Jane Doe",
                    "email": "jane@acme.test",
                    "company": {"id": 1, "name": "Acme"},
                    "created_at": "2025-10-01T09:00:00+00:00",
                    "updated_at": "2025-10-01T09:00:00+00:00"
                }
            ],
            "current_page": 1,
            "per_page": 5,
            "total": 1,
            "last_page": 1,
            "from": 1,
            "to": 1,
            "next_page_url": null,
            "prev_page_url": null
        })),
        (status = 400, description = "Invalid query parameters", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<EmployeeResource>>, ApiError> {
    let Query(query) = query?;
    let page = state
        .employees
        .get_all(query.page_request(state.config.page_size)?)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page, COLLECTION_PATH)))
}

/// Creates an employee under an existing company
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body(
        description = "Employee attributes as JSON or form fields",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Employee created", body = EmployeeResource),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 422, description = "Validation failed or unknown company", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<EmployeeResource>), ApiError> {
    let attributes = rules::validate_create(&input)?;
    let employee = state.employees.create(attributes).await?;

    Ok((StatusCode::CREATED, Json(employee.into())))
}

/// Fetches a single employee
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResource),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn show_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<EmployeeResource>, ApiError> {
    let Path(id) = id?;
    let employee = state
        .employees
        .get_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Employee", id))?;

    Ok(Json(employee.into()))
}

/// Updates the supplied attributes of an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee id")),
    request_body(
        description = "Attributes to change as JSON or form fields",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResource),
        (status = 404, description = "Employee not found", body = ApiError),
        (status = 422, description = "Validation failed or unknown company", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    FormInput(input): FormInput,
) -> Result<Json<EmployeeResource>, ApiError> {
    let Path(id) = id?;
    let changes = rules::validate_update(&input)?;
    let employee = state.employees.update(id, changes).await?;

    Ok(Json(employee.into()))
}

/// Deletes an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.employees.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
