//! Cloudinary implementation of [`MediaHost`].
//!
//! - **Search**: `POST {api_base}/v1_1/{cloud}/resources/search` with HTTP
//!   basic auth (`api_key:api_secret`) and a JSON body.
//! - **Transform fetch**: unauthenticated `GET` against the public delivery
//!   host, see [`delivery_url`].
//!
//! The client is built without a request timeout and never retries. A
//! non-2xx status is an error carrying the response body, so auth failures
//! surface with Cloudinary's own message.

use super::host::{MediaError, MediaHost, Resource, SearchQuery};
use super::transform::{DEFAULT_DELIVERY_BASE, Transform, delivery_url};
use crate::config::MediaEnv;
use log::debug;
use serde::Deserialize;

/// Admin/search API host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<Resource>,
}

pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
    delivery_base: String,
}

impl CloudinaryClient {
    pub fn new(env: &MediaEnv) -> Result<Self, MediaError> {
        Self::with_endpoints(env, DEFAULT_API_BASE, DEFAULT_DELIVERY_BASE)
    }

    /// Point the client at other hosts (a mock server in tests, a proxy in CI).
    pub fn with_endpoints(
        env: &MediaEnv,
        api_base: &str,
        delivery_base: &str,
    ) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cloud-gal/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            cloud_name: env.cloud_name.clone(),
            api_key: env.api_key.clone(),
            api_secret: env.api_secret.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
            delivery_base: delivery_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/v1_1/{}/resources/search", self.api_base, self.cloud_name)
    }

    pub fn transform_url(&self, public_id: &str, format: &str, transform: &Transform) -> String {
        delivery_url(
            &self.delivery_base,
            &self.cloud_name,
            public_id,
            format,
            transform,
        )
    }
}

/// Turn a non-2xx response into [`MediaError::Status`].
async fn check_status(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, MediaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MediaError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

impl MediaHost for CloudinaryClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Resource>, MediaError> {
        let url = self.search_url();
        debug!("search {} ({})", query.expression, url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&query.to_json())
            .send()
            .await?;
        let body = check_status(response, &url).await?.text().await?;

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| MediaError::Malformed {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        debug!("search returned {} resources", parsed.resources.len());
        Ok(parsed.resources)
    }

    async fn fetch_transform(
        &self,
        public_id: &str,
        format: &str,
        transform: &Transform,
    ) -> Result<Vec<u8>, MediaError> {
        let url = self.transform_url(public_id, format, transform);
        debug!("fetch {url}");

        let response = self.http.get(&url).send().await?;
        let bytes = check_status(response, &url).await?.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyBody(url));
        }
        Ok(bytes.to_vec())
    }
}
