//! Media host trait and shared types.
//!
//! The [`MediaHost`] trait defines the two remote operations the gallery core
//! needs: a search over the media index and a fetch of a transformed asset.
//!
//! The production implementation is
//! [`CloudinaryClient`](super::cloudinary::CloudinaryClient). Tests use the
//! [`MockHost`](tests::MockHost) below, which records calls without touching
//! the network.

use super::transform::Transform;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("Empty response body from {0}")]
    EmptyBody(String),
}

/// One asset record as reported by the media index.
///
/// Only the fields the gallery needs; everything else in the response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
}

/// A search over the media index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search expression, e.g. `folder:gallery/*`.
    pub expression: String,
    /// Field the index sorts by, descending.
    pub sort_by: String,
    pub max_results: u32,
}

impl SearchQuery {
    /// Every asset under `folder`, sorted by public id descending.
    pub fn folder(folder: &str, max_results: u32) -> Self {
        Self {
            expression: format!("folder:{folder}/*"),
            sort_by: "public_id".to_string(),
            max_results,
        }
    }

    /// Request body in the search API's JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        let mut sort = serde_json::Map::new();
        sort.insert(self.sort_by.clone(), "desc".into());
        serde_json::json!({
            "expression": self.expression,
            "sort_by": [sort],
            "max_results": self.max_results,
        })
    }
}

/// Remote media store operations.
///
/// Both methods are suspension points; nothing else in the gallery core
/// suspends. Implementations must be shareable across the concurrent
/// placeholder fetches, hence `Sync`.
pub trait MediaHost: Sync {
    /// Query the media index.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Resource>, MediaError>> + Send;

    /// Fetch the raw bytes of `public_id` under `transform`.
    fn fetch_transform(
        &self,
        public_id: &str,
        format: &str,
        transform: &Transform,
    ) -> impl Future<Output = Result<Vec<u8>, MediaError>> + Send;
}
