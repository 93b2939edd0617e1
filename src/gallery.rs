//! Image listing.
//!
//! Queries the media index for every asset under the configured folder and
//! maps each record to an [`ImageDescriptor`]. The index sorts by public id
//! descending; ids are assigned by position in that order:
//!
//! ```text
//! index:  "gallery/c"  "gallery/b"  "gallery/a"
//! id:          0            1            2
//! ```
//!
//! The host's order is kept as-is. Records with equal sort keys keep whatever
//! tie-break the host applies, so ids are not comparable across builds.

use crate::config::{ConfigError, MAX_SEARCH_RESULTS};
use crate::media::{MediaError, MediaHost, Resource, SearchQuery};
use crate::types::ImageDescriptor;
use log::{info, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Media index query failed: {0}")]
    Query(#[from] MediaError),
}

/// Normalise a folder path; blank input is a configuration error.
pub fn normalize_folder(folder: &str) -> Result<&str, ConfigError> {
    let folder = folder.trim().trim_matches('/');
    if folder.is_empty() {
        return Err(ConfigError::EmptyFolder);
    }
    Ok(folder)
}

/// Map index records to descriptors, ids by position.
pub fn to_descriptors(resources: Vec<Resource>) -> Vec<ImageDescriptor> {
    resources
        .into_iter()
        .enumerate()
        .map(|(id, r)| ImageDescriptor {
            id,
            width: r.width,
            height: r.height,
            public_id: r.public_id,
            format: r.format,
            blur_data_url: None,
        })
        .collect()
}

/// List every image under `folder`, at most `max_results` (capped at 400).
///
/// The folder is validated before any request is made.
pub async fn list_images(
    host: &impl MediaHost,
    folder: &str,
    max_results: u32,
) -> Result<Vec<ImageDescriptor>, GalleryError> {
    let folder = normalize_folder(folder)?;
    let cap = max_results.clamp(1, MAX_SEARCH_RESULTS);
    let query = SearchQuery::folder(folder, cap);

    let mut resources = host.search(&query).await?;
    if resources.len() > cap as usize {
        warn!(
            "media index returned {} results for a cap of {}, dropping the rest",
            resources.len(),
            cap
        );
        resources.truncate(cap as usize);
    }

    info!("listed {} images under {}", resources.len(), folder);
    Ok(to_descriptors(resources))
}
