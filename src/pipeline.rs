//! Fetch pipeline: image listing followed by placeholder generation.
//!
//! ```text
//! MediaEnv + SiteConfig ──► list_images ──► generate_placeholders ──► GalleryManifest
//! ```
//!
//! Failures are mapped onto three kinds, all fatal to the build:
//!
//! | Kind | Raised when |
//! |---|---|
//! | [`BuildError::Configuration`] | env/config missing or invalid; raised before any request |
//! | [`BuildError::RemoteQuery`] | the media index search fails |
//! | [`BuildError::RemoteFetch`] | any one placeholder fetch fails |
//!
//! Nothing is retried and no partial manifest is ever produced.

use crate::config::{ConfigError, MediaEnv, SiteConfig};
use crate::gallery::{self, GalleryError};
use crate::media::{MediaError, MediaHost};
use crate::placeholder::{self, PlaceholderError};
use crate::types::ImageDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Remote query failed: {0}")]
    RemoteQuery(#[source] MediaError),
    #[error("Remote fetch failed for {public_id}: {source}")]
    RemoteFetch {
        public_id: String,
        #[source]
        source: MediaError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GalleryError> for BuildError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::Config(e) => BuildError::Configuration(e),
            GalleryError::Query(e) => BuildError::RemoteQuery(e),
        }
    }
}

impl From<PlaceholderError> for BuildError {
    fn from(err: PlaceholderError) -> Self {
        match err {
            PlaceholderError::Fetch { public_id, source } => {
                BuildError::RemoteFetch { public_id, source }
            }
        }
    }
}

/// Output of the fetch stage, input of the render stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub cloud_name: String,
    pub folder: String,
    pub images: Vec<ImageDescriptor>,
    pub config: SiteConfig,
}

impl GalleryManifest {
    /// True when every image carries a placeholder.
    pub fn is_complete(&self) -> bool {
        self.images.iter().all(|i| {
            i.blur_data_url
                .as_deref()
                .is_some_and(|url| !url.is_empty())
        })
    }
}

/// List the folder and enrich every image with its placeholder.
pub async fn fetch_gallery(
    host: &impl MediaHost,
    env: &MediaEnv,
    config: &SiteConfig,
) -> Result<GalleryManifest, BuildError> {
    config.validate()?;
    let images = gallery::list_images(host, &env.folder, config.gallery.max_results).await?;
    let images = placeholder::generate_placeholders(host, images, &config.placeholder).await?;

    Ok(GalleryManifest {
        cloud_name: env.cloud_name.clone(),
        folder: env.folder.clone(),
        images,
        config: config.clone(),
    })
}

pub fn write_manifest(path: &Path, manifest: &GalleryManifest) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_manifest(path: &Path) -> Result<GalleryManifest, BuildError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
