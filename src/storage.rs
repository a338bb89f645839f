//! # Asset Storage
//!
//! Uploaded binary assets (company logos) are written through the [`AssetStore`] trait
//! and replaced by a publicly resolvable reference before a record is persisted.

use std::path::PathBuf;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

/// Accepted image content types and the extension each is stored under.
///
/// `image/svg+xml` is not accepted.
pub const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
];

/// A file received in a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename as sent by the client, if any
    pub file_name: Option<String>,
    /// Declared MIME type
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Extension for the declared content type, if it is one of [`IMAGE_TYPES`].
    ///
    /// The client's filename is never consulted; the stored name decides the MIME
    /// type the asset is later served with.
    pub fn image_extension(&self) -> Option<&'static str> {
        let declared = self.content_type.as_deref()?;
        let essence = declared
            .split(';')
            .next()
            .unwrap_or(declared)
            .trim()
            .to_ascii_lowercase();

        IMAGE_TYPES
            .iter()
            .find(|(content_type, _)| *content_type == essence)
            .map(|(_, extension)| *extension)
    }
}

/// Namespaces assets are grouped under, one per owning entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetNamespace {
    CompanyLogo,
}

impl AssetNamespace {
    pub fn as_path(&self) -> &'static str {
        match self {
            AssetNamespace::CompanyLogo => "company/logo",
        }
    }
}

/// Reference to a stored asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Path relative to the store root, e.g. `company/logo/<uuid>.png`
    pub path: String,
    /// Publicly resolvable URL for the asset
    pub url: String,
}

/// Errors raised while writing or removing assets
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("asset I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported asset content type {content_type:?}")]
    UnsupportedType { content_type: Option<String> },
}

/// Durable storage for uploaded assets
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `file` under `namespace`, returning its public reference.
    async fn store(
        &self,
        namespace: AssetNamespace,
        file: &UploadedFile,
    ) -> Result<StoredAsset, StorageError>;

    /// Remove a previously stored asset. Removing a missing asset is not an error.
    async fn remove(&self, asset: &StoredAsset) -> Result<(), StorageError>;
}

/// Asset store backed by a local directory that the server exposes over HTTP
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.storage_root.clone(),
            config.public_asset_base_url.clone(),
        )
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(
        &self,
        namespace: AssetNamespace,
        file: &UploadedFile,
    ) -> Result<StoredAsset, StorageError> {
        let extension = file
            .image_extension()
            .ok_or_else(|| StorageError::UnsupportedType {
                content_type: file.content_type.clone(),
            })?;

        let directory = self.root.join(namespace.as_path());
        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|source| StorageError::Io {
                path: directory.clone(),
                source,
            })?;

        let file_name = format!("{}.{extension}", Uuid::new_v4().simple());
        let target = directory.join(&file_name);
        tokio::fs::write(&target, &file.bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: target.clone(),
                source,
            })?;

        let path = format!("{}/{}", namespace.as_path(), file_name);
        let url = format!("{}/{}", self.public_base_url, path);

        counter!("assets_stored_total", "namespace" => namespace.as_path()).increment(1);
        tracing::info!(%path, size = file.bytes.len(), "Stored uploaded asset");

        Ok(StoredAsset { path, url })
    }

    async fn remove(&self, asset: &StoredAsset) -> Result<(), StorageError> {
        let target = self.root.join(&asset.path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %asset.path, "Removed stored asset");
                Ok(())
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: target,
                source,
            }),
        }
    }
}
