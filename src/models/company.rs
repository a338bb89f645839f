//! Company entity model
//!
//! This module contains the SeaORM entity model for the companies table.
//! A company owns zero or more employees.

use sea_orm::ActiveModelBehavior;
use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier (primary key, auto-increment)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Company name
    pub name: String,

    /// Contact email address
    pub email: String,

    /// Public URL of the stored logo asset
    pub logo: Option<String>,

    /// Company website
    pub website: Option<String>,

    /// Timestamp when the company was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the company was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee::Entity")]
    Employees,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Minimal company projection used for dropdowns and eager-loaded relations
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
}
