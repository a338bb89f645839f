//! Company repository for database operations
//!
//! This module provides the CompanyRepository struct which encapsulates
//! SeaORM operations for the companies table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::error::RepositoryError;
use crate::listing::{ListingEntry, ListingSource};
use crate::models::company::{self, CompanySummary, Entity as Company};
use crate::models::employee::{self, Entity as Employee};
use crate::repositories::pagination::{Page, PageRequest};

const ENTITY: &str = "Company";

/// Validated attributes for a new company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

/// Validated partial update for a company.
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub logo: Option<Option<String>>,
    pub website: Option<Option<String>>,
}

/// Repository for company database operations
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Returns one page of companies ordered by id
    pub async fn get_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<company::Model>, RepositoryError> {
        let paginator = Company::find()
            .order_by_asc(company::Column::Id)
            .paginate(&*self.db, request.per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(RepositoryError::database_error)?;
        let companies = paginator
            .fetch_page(request.index())
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(Page::new(companies, request, total))
    }

    /// Finds a company by id
    pub async fn get_by_id(&self, id: i32) -> Result<Option<company::Model>, RepositoryError> {
        Company::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Persists a new company and returns it with its assigned id
    pub async fn create(&self, input: NewCompany) -> Result<company::Model, RepositoryError> {
        let now = Utc::now();

        let company = company::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            logo: Set(input.logo),
            website: Set(input.website),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = company
            .insert(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        counter!("directory_records_total", "entity" => "company", "operation" => "create")
            .increment(1);
        tracing::info!(company_id = created.id, "Company created");

        Ok(created)
    }

    /// Applies the supplied attributes to an existing company
    pub async fn update(
        &self,
        id: i32,
        changes: CompanyChanges,
    ) -> Result<company::Model, RepositoryError> {
        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;

        let mut active_model = existing.into_active_model();

        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(email) = changes.email {
            active_model.email = Set(email);
        }
        if let Some(logo) = changes.logo {
            active_model.logo = Set(logo);
        }
        if let Some(website) = changes.website {
            active_model.website = Set(website);
        }
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model
            .update(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        counter!("directory_records_total", "entity" => "company", "operation" => "update")
            .increment(1);

        Ok(updated)
    }

    /// Deletes a company together with its employees in one transaction
    pub async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let company = Company::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;

        let removed = Employee::delete_many()
            .filter(employee::Column::CompanyId.eq(id))
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        company
            .delete(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        counter!("directory_records_total", "entity" => "company", "operation" => "delete")
            .increment(1);
        tracing::info!(
            company_id = id,
            employees_removed = removed.rows_affected,
            "Company deleted"
        );

        Ok(true)
    }

    /// Unpaginated id/name listing ordered by name, for selection dropdowns
    pub async fn get_list(&self) -> Result<Vec<CompanySummary>, RepositoryError> {
        Company::find()
            .select_only()
            .column(company::Column::Id)
            .column(company::Column::Name)
            .order_by_asc(company::Column::Name)
            .order_by_asc(company::Column::Id)
            .into_model::<CompanySummary>()
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

#[async_trait]
impl ListingSource for CompanyRepository {
    fn key(&self) -> &'static str {
        "company"
    }

    async fn list(&self) -> Result<Vec<ListingEntry>, RepositoryError> {
        let companies = self.get_list().await?;
        Ok(companies.into_iter().map(ListingEntry::from).collect())
    }
}
