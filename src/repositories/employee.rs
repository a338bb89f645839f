//! Employee repository for database operations
//!
//! This module provides the EmployeeRepository struct which encapsulates
//! SeaORM operations for the employees table. Listings eager-load the owning
//! company's id and name with one batched query per page.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::company::{self, CompanySummary, Entity as Company};
use crate::models::employee::{self, Entity as Employee};
use crate::repositories::pagination::{Page, PageRequest};

const ENTITY: &str = "Employee";

/// Validated attributes for a new employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub company_id: i32,
    pub name: String,
    pub email: String,
}

/// Validated partial update for an employee; `None` leaves a column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub company_id: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Employee row with its owning company's summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeWithCompany {
    pub employee: employee::Model,
    pub company: Option<CompanySummary>,
}

/// Repository for employee database operations
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Returns one page of employees ordered by id, each with its company's id and name
    pub async fn get_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<EmployeeWithCompany>, RepositoryError> {
        let paginator = Employee::find()
            .order_by_asc(employee::Column::Id)
            .paginate(&*self.db, request.per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(RepositoryError::database_error)?;
        let employees = paginator
            .fetch_page(request.index())
            .await
            .map_err(RepositoryError::database_error)?;

        let mut company_ids: Vec<i32> = employees.iter().map(|e| e.company_id).collect();
        company_ids.sort_unstable();
        company_ids.dedup();

        let companies = self.company_summaries(company_ids).await?;

        let rows = employees
            .into_iter()
            .map(|employee| EmployeeWithCompany {
                company: companies.get(&employee.company_id).cloned(),
                employee,
            })
            .collect();

        Ok(Page::new(rows, request, total))
    }

    /// Finds an employee by id
    pub async fn get_by_id(&self, id: i32) -> Result<Option<employee::Model>, RepositoryError> {
        Employee::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Persists a new employee after checking the referenced company exists.
    ///
    /// The check and the insert share one transaction; a foreign key violation from a
    /// concurrent company delete still surfaces as a `company_id` field error.
    pub async fn create(&self, input: NewEmployee) -> Result<employee::Model, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        ensure_company_exists(&txn, input.company_id).await?;

        let now = Utc::now();
        let employee = employee::ActiveModel {
            company_id: Set(input.company_id),
            name: Set(input.name),
            email: Set(input.email),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = employee.insert(&txn).await.map_err(map_write_error)?;
        txn.commit().await.map_err(map_write_error)?;

        counter!("directory_records_total", "entity" => "employee", "operation" => "create")
            .increment(1);
        tracing::info!(
            employee_id = created.id,
            company_id = created.company_id,
            "Employee created"
        );

        Ok(created)
    }

    /// Applies the supplied attributes to an existing employee
    pub async fn update(
        &self,
        id: i32,
        changes: EmployeeChanges,
    ) -> Result<employee::Model, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let existing = Employee::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;

        if let Some(company_id) = changes.company_id
            && company_id != existing.company_id
        {
            ensure_company_exists(&txn, company_id).await?;
        }

        let mut active_model = existing.into_active_model();

        if let Some(company_id) = changes.company_id {
            active_model.company_id = Set(company_id);
        }
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(email) = changes.email {
            active_model.email = Set(email);
        }
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model.update(&txn).await.map_err(map_write_error)?;
        txn.commit().await.map_err(map_write_error)?;

        counter!("directory_records_total", "entity" => "employee", "operation" => "update")
            .increment(1);

        Ok(updated)
    }

    /// Deletes an employee by id
    pub async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let delete_result = Employee::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if delete_result.rows_affected == 0 {
            return Err(RepositoryError::not_found(ENTITY, id));
        }

        counter!("directory_records_total", "entity" => "employee", "operation" => "delete")
            .increment(1);

        Ok(true)
    }

    async fn company_summaries(
        &self,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, CompanySummary>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let summaries = Company::find()
            .select_only()
            .column(company::Column::Id)
            .column(company::Column::Name)
            .filter(company::Column::Id.is_in(ids))
            .into_model::<CompanySummary>()
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(summaries
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect())
    }
}

fn unknown_company() -> RepositoryError {
    RepositoryError::ReferentialIntegrity {
        field: "company_id",
        message: "The selected company does not exist".to_string(),
    }
}

async fn ensure_company_exists<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
) -> Result<(), RepositoryError> {
    let count = Company::find()
        .filter(company::Column::Id.eq(company_id))
        .count(db)
        .await
        .map_err(RepositoryError::database_error)?;

    if count == 0 {
        return Err(unknown_company());
    }

    Ok(())
}

/// Maps a foreign key violation on write to the `company_id` field error
fn map_write_error(error: DbErr) -> RepositoryError {
    if let Some(SqlErr::ForeignKeyConstraintViolation(detail)) = error.sql_err() {
        tracing::debug!(%detail, "Employee write violated company foreign key");
        return unknown_company();
    }
    RepositoryError::database_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn foreign_key_violation_becomes_field_error() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        // bypasses the existence check, as a concurrent company delete would
        let now = Utc::now();
        let error = employee::ActiveModel {
            company_id: Set(404),
            name: Set("Jane".to_string()),
            email: Set("jane@acme.test".to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap_err();

        match map_write_error(error) {
            RepositoryError::ReferentialIntegrity { field, .. } => assert_eq!(field, "company_id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_write_errors_stay_database_errors() {
        let error = map_write_error(DbErr::Custom("disk full".to_string()));

        assert!(matches!(error, RepositoryError::Database(_)));
    }
}
