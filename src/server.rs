//! # Server Configuration
//!
//! This module contains the server setup and configuration for the directory API.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers::{self, companies, employees, lookup};
use crate::listing::ListingRegistry;
use crate::repositories::{CompanyRepository, EmployeeRepository};
use crate::storage::{AssetStore, LocalAssetStore};
use crate::telemetry::trace_id_middleware;

/// Headroom above the upload limit for the other multipart fields
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub companies: CompanyRepository,
    pub employees: EmployeeRepository,
    pub assets: Arc<dyn AssetStore>,
    pub listings: Arc<ListingRegistry>,
}

impl AppState {
    /// Wires repositories, the local asset store, and the lookup registry.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        let assets = Arc::new(LocalAssetStore::from_config(&config));
        Self::with_asset_store(config, db, assets)
    }

    /// Like [`AppState::new`] with a caller-supplied asset store.
    pub fn with_asset_store(
        config: AppConfig,
        db: DatabaseConnection,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        let db = Arc::new(db);
        let companies = CompanyRepository::new(db.clone());
        let employees = EmployeeRepository::new(db.clone());
        let listings = ListingRegistry::new().register(Arc::new(companies.clone()));

        Self {
            config: Arc::new(config),
            db,
            companies,
            employees,
            assets,
            listings: Arc::new(listings),
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{id}",
            get(companies::show_company)
                .put(companies::update_company)
                .patch(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/{id}",
            get(employees::show_employee)
                .put(employees::update_employee)
                .patch(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/list", get(lookup::get_list));

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .nest("/api", api);

    // Serve stored assets when they are published under a local path
    let asset_path = state.config.public_asset_base_url.trim_end_matches('/');
    if asset_path.starts_with('/') && !asset_path.is_empty() {
        router = router.nest_service(asset_path, ServeDir::new(&state.config.storage_root));
    }

    let body_limit = state.config.max_upload_bytes() + BODY_LIMIT_OVERHEAD;

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> Result<()> {
    let addr = config.bind_addr().context("invalid server address")?;

    tokio::fs::create_dir_all(&config.storage_root)
        .await
        .with_context(|| {
            format!(
                "creating storage root {}",
                config.storage_root.display()
            )
        })?;

    let profile = config.profile.clone();
    let state = AppState::new(config, db);
    tracing::info!(
        listings = ?state.listings.keys().collect::<Vec<_>>(),
        "Registered lookup listings"
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::companies::list_companies,
        crate::handlers::companies::create_company,
        crate::handlers::companies::show_company,
        crate::handlers::companies::update_company,
        crate::handlers::companies::delete_company,
        crate::handlers::employees::list_employees,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::show_employee,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::lookup::get_list,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::CompanySummary,
            crate::handlers::HealthStatus,
            crate::handlers::types::CompanyResource,
            crate::handlers::types::EmployeeResource,
            crate::handlers::types::ListQuery,
            crate::handlers::lookup::ListingQuery,
            crate::listing::ListingEntry,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "companies", description = "Company records"),
        (name = "employees", description = "Employee records"),
        (name = "lookup", description = "Lightweight listings for selection inputs"),
    ),
    info(
        title = "Company Directory API",
        description = "API for managing companies and their employees",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
