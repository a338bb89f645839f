//! # Lookup Listing Handler
//!
//! `GET /api/list?param=<key>` returns a lightweight id/name listing for the
//! entity registered under `key`, or `null` when nothing is registered for it.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::listing::ListingEntry;
use crate::server::AppState;

/// Query parameters for the lookup listing
#[derive(Debug, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct ListingQuery {
    /// Entity discriminator, e.g. "company"
    pub param: Option<String>,
}

/// Returns an unpaginated id/name listing selected by `param`
#[utoipa::path(
    get,
    path = "/api/list",
    params(ListingQuery),
    responses(
        (status = 200, description = "Listing for the requested entity, or null when the discriminator is unknown or missing", body = Option<Vec<ListingEntry>>, example = json!([
            {"id": 2, "name": "Acme"},
            {"id": 1, "name": "Globex"}
        ]))
    ),
    tag = "lookup"
)]
pub async fn get_list(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<Option<Vec<ListingEntry>>>, ApiError> {
    let Query(query) = query?;

    let Some(key) = query.param.as_deref() else {
        return Ok(Json(None));
    };

    let listing = state.listings.dispatch(key).await?;
    if listing.is_none() {
        tracing::debug!(param = key, "No listing registered for discriminator");
    }

    Ok(Json(listing))
}
