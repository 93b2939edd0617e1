//! Shared test utilities for the cloud-gal test suite.
//!
//! Builders for environments, descriptors and manifests, plus lookups that
//! panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = sample_manifest(&["c", "b", "a"]);
//! let image = find_image(&manifest, "b");
//! assert_eq!(image.id, 1);
//! ```

use crate::config::{MediaEnv, SiteConfig};
use crate::pipeline::GalleryManifest;
use crate::types::ImageDescriptor;

pub const BLUR: &str = "data:image/jpeg;base64,/9j/4AAQ";

pub fn test_env() -> MediaEnv {
    MediaEnv {
        cloud_name: "demo".to_string(),
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
        folder: "gallery".to_string(),
    }
}

/// A fully enriched descriptor, 1200x800 jpg.
pub fn sample_image(id: usize, public_id: &str) -> ImageDescriptor {
    ImageDescriptor {
        id,
        width: 1200,
        height: 800,
        public_id: public_id.to_string(),
        format: "jpg".to_string(),
        blur_data_url: Some(BLUR.to_string()),
    }
}

/// A complete manifest with one image per public id, ids by position.
pub fn sample_manifest(public_ids: &[&str]) -> GalleryManifest {
    let mut config = SiteConfig::default();
    config.site.title = "Test Gallery".to_string();
    config.site.description = "Photos for tests".to_string();
    config.site.url = "https://gallery.example.com/".to_string();

    GalleryManifest {
        cloud_name: "demo".to_string(),
        folder: "gallery".to_string(),
        images: public_ids
            .iter()
            .enumerate()
            .map(|(i, id)| sample_image(i, id))
            .collect(),
        config,
    }
}

/// Find an image by public id. Panics if not found.
pub fn find_image<'a>(manifest: &'a GalleryManifest, public_id: &str) -> &'a ImageDescriptor {
    manifest
        .images
        .iter()
        .find(|i| i.public_id == public_id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = manifest.images.iter().map(|i| i.public_id.as_str()).collect();
            panic!("image '{public_id}' not found. Available: {ids:?}")
        })
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
