//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for the directory entities, providing uniform CRUD, pagination and eager loading.

pub mod company;
pub mod employee;
pub mod pagination;

pub use company::{CompanyChanges, CompanyRepository, NewCompany};
pub use employee::{EmployeeChanges, EmployeeRepository, EmployeeWithCompany, NewEmployee};
pub use pagination::{Page, PageRequest};
