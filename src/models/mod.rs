//! # Data Models
//!
//! This module contains all the data models used throughout the directory API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod company;
pub mod employee;

pub use company::CompanySummary;
pub use company::Entity as Company;
pub use employee::Entity as Employee;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "directory".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
