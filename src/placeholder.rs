//! Blur placeholder generation.
//!
//! For every descriptor, fetch a tiny transform of the same asset
//! (`f_jpg,w_8,q_70` by default) and inline it as a `data:` URL that the page
//! paints behind the real image while it loads.
//!
//! ## Concurrency
//!
//! All fetches are issued at once and joined with
//! [`try_join_all`](futures::future::try_join_all):
//!
//! - execution order is whatever the network gives back,
//! - result `i` always belongs to input `i`,
//! - the first failure fails the whole step and drops the fetches still pending.
//!
//! There is no partial result: either every descriptor comes back with a
//! `blur_data_url`, or the caller gets an error.

use crate::config::PlaceholderConfig;
use crate::media::{MediaError, MediaHost, Transform};
use crate::types::ImageDescriptor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("Placeholder fetch failed for {public_id}: {source}")]
    Fetch {
        public_id: String,
        #[source]
        source: MediaError,
    },
}

/// The transform requested for every placeholder.
pub fn blur_transform(config: &PlaceholderConfig) -> Transform {
    Transform::preview(&config.format, config.width, config.quality)
}

/// MIME type for a transform format extension, if the `image` crate knows it.
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    image::ImageFormat::from_extension(ext).map(|f| f.to_mime_type())
}

/// Encode `bytes` as a self-contained `data:` URL.
///
/// The MIME type is sniffed from the payload; `fallback_format` (the requested
/// transform format) is used when the bytes aren't recognised.
pub fn encode_data_url(bytes: &[u8], fallback_format: &str) -> String {
    let mime = image::guess_format(bytes)
        .ok()
        .map(|f| f.to_mime_type())
        .or_else(|| mime_for_extension(fallback_format))
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Fetch and encode the placeholder of a single image.
pub async fn blur_data_url(
    host: &impl MediaHost,
    image: &ImageDescriptor,
    transform: &Transform,
    fallback_format: &str,
) -> Result<String, PlaceholderError> {
    let bytes = host
        .fetch_transform(&image.public_id, &image.format, transform)
        .await
        .map_err(|source| PlaceholderError::Fetch {
            public_id: image.public_id.clone(),
            source,
        })?;
    debug!("placeholder for {}: {} bytes", image.public_id, bytes.len());
    Ok(encode_data_url(&bytes, fallback_format))
}

/// Populate `blur_data_url` on every descriptor, all fetches concurrently.
pub async fn generate_placeholders(
    host: &impl MediaHost,
    mut images: Vec<ImageDescriptor>,
    config: &PlaceholderConfig,
) -> Result<Vec<ImageDescriptor>, PlaceholderError> {
    if images.is_empty() {
        return Ok(images);
    }

    let transform = blur_transform(config);
    info!(
        "fetching {} placeholders ({})",
        images.len(),
        transform
    );

    let urls = try_join_all(
        images
            .iter()
            .map(|image| blur_data_url(host, image, &transform, &config.format)),
    )
    .await?;

    for (image, url) in images.iter_mut().zip(urls) {
        image.blur_data_url = Some(url);
    }
    Ok(images)
}
