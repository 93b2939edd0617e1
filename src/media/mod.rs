//! Remote media store access.
//!
//! | Operation | Endpoint |
//! |---|---|
//! | **Search** | `POST /v1_1/{cloud}/resources/search` (basic auth) |
//! | **Transform fetch** | `GET /{cloud}/image/upload/{transform}/{public_id}.{format}` |
//!
//! The module is split into:
//! - **Transform**: Pure description of derived versions and their URLs (unit testable)
//! - **Host**: [`MediaHost`] trait, shared record types, mock for tests
//! - **Cloudinary**: [`CloudinaryClient`], the `reqwest` implementation

pub mod cloudinary;
pub mod host;
pub mod transform;

pub use cloudinary::CloudinaryClient;
pub use host::{MediaError, MediaHost, Resource, SearchQuery};
pub use transform::{Crop, DEFAULT_DELIVERY_BASE, Transform, delivery_url};
