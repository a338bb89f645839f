//! # Lookup Listings
//!
//! Lightweight, unpaginated listings selected by a discriminator value, used to
//! populate selection dropdowns. Sources register under a key in the
//! [`ListingRegistry`]; adding a listing means registering another source.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::models::CompanySummary;

/// One option of a lookup listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListingEntry {
    pub id: i32,
    pub name: String,
}

impl From<CompanySummary> for ListingEntry {
    fn from(summary: CompanySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
        }
    }
}

/// A source of lookup entries
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Discriminator value this source answers to
    fn key(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<ListingEntry>, RepositoryError>;
}

/// Dispatch table from discriminator value to listing source
#[derive(Clone, Default)]
pub struct ListingRegistry {
    sources: BTreeMap<&'static str, Arc<dyn ListingSource>>,
}

impl ListingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under its key, replacing any previous source for that key.
    pub fn register(mut self, source: Arc<dyn ListingSource>) -> Self {
        self.sources.insert(source.key(), source);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn ListingSource>> {
        self.sources.get(key)
    }

    /// Run the listing registered for `key`; `None` when no source is registered.
    pub async fn dispatch(
        &self,
        key: &str,
    ) -> Result<Option<Vec<ListingEntry>>, RepositoryError> {
        match self.get(key) {
            Some(source) => source.list().await.map(Some),
            None => Ok(None),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.keys().copied()
    }
}

impl std::fmt::Debug for ListingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingRegistry")
            .field("keys", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
