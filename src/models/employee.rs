//! Employee entity model
//!
//! This module contains the SeaORM entity model for the employees table.
//! Every employee belongs to exactly one company.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Employee entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier (primary key, auto-increment)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning company
    pub company_id: i32,

    /// Employee name
    pub name: String,

    /// Employee email address
    pub email: String,

    /// Timestamp when the employee was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the employee was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
