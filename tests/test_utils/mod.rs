//! Test utilities for database and API testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, fixture helpers, and a router wired to a temporary
//! asset directory.

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use directory::config::AppConfig;
use directory::models::{company, employee};
use directory::repositories::{CompanyRepository, EmployeeRepository, NewCompany, NewEmployee};
use directory::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Sets up an in-memory SQLite database with all migrations applied and returns an Arc.
#[allow(dead_code)]
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// Inserts a company with a derived email address.
#[allow(dead_code)]
pub async fn insert_company(repo: &CompanyRepository, name: &str) -> Result<company::Model> {
    let email = format!("contact@{}.test", name.to_lowercase().replace(' ', "-"));
    let created = repo
        .create(NewCompany {
            name: name.to_string(),
            email,
            logo: None,
            website: None,
        })
        .await?;
    Ok(created)
}

/// Inserts an employee of `company_id` with a derived email address.
#[allow(dead_code)]
pub async fn insert_employee(
    repo: &EmployeeRepository,
    company_id: i32,
    name: &str,
) -> Result<employee::Model> {
    let email = format!("{}@staff.test", name.to_lowercase().replace(' ', "."));
    let created = repo
        .create(NewEmployee {
            company_id,
            name: name.to_string(),
            email,
        })
        .await?;
    Ok(created)
}

/// A router over a fresh database plus the temporary directory holding its assets.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Result<Self> {
        let storage = tempfile::tempdir()?;
        let db = setup_test_db().await?;
        let config = AppConfig {
            storage_root: storage.path().to_path_buf(),
            ..Default::default()
        };

        let state = AppState::new(config, db);
        let router = create_app(state.clone());

        Ok(Self {
            router,
            state,
            storage,
        })
    }

    /// Sends `request` and decodes the JSON body (`Value::Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Request::builder().uri(uri).body(Body::empty())?)
            .await
    }

    /// Fetches `uri` and returns the raw response body.
    pub async fn get_raw(&self, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())?,
        )
        .await
    }
}

/// Builds a multipart body from text fields and at most one file part.
#[allow(dead_code)]
pub fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
