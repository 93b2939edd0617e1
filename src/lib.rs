//! # Cloud Gal
//!
//! A static site generator for a single-page photo gallery whose photos live
//! in a Cloudinary folder. The folder is the data source: whatever is
//! uploaded there becomes the gallery, newest public id first.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Fetch     folder    →  manifest.json   (media index → descriptors + blur previews)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! The fetch stage is the only part that talks to the network. It runs two
//! steps: the image listing (one search request) and the placeholder
//! generation (one transform fetch per image, all concurrent). Either step
//! failing aborts the build; there is no partial gallery.
//!
//! The manifest between the stages is plain JSON, so the render stage can be
//! iterated on without hitting the media host again (`cloud-gal generate`).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging; `MediaEnv` from the environment |
//! | [`media`] | `MediaHost` trait, Cloudinary client, transform URLs |
//! | [`gallery`] | Image listing: search → ordered `ImageDescriptor`s |
//! | [`placeholder`] | Concurrent blur preview fetch and `data:` URL encoding |
//! | [`pipeline`] | Listing + placeholders, error taxonomy, manifest I/O |
//! | [`generate`] | Renders the final HTML site using Maud |
//! | [`types`] | `ImageDescriptor`, shared between the stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail Fast, Never Partial
//!
//! A missing credential or an empty folder name is reported before any
//! request goes out. A failed search or a single failed placeholder fetch
//! fails the whole build. Nothing is retried and nothing times out; a stalled
//! request stalls the build.
//!
//! ## Ids Are Positions
//!
//! Photo ids are the position in the search result (sorted by public id,
//! descending). They are dense and unique within one build but may shift
//! between builds as photos are added or removed.
//!
//! ## Static First, Script Second
//!
//! Every grid link points at a real viewer page (`/p/<id>/`), so the gallery
//! works without JavaScript. The inline script upgrades clicks to a modal,
//! mirrors it in the `?photoId=` query parameter, and remembers the last
//! viewed photo in `localStorage` to scroll back to it on return.

pub mod config;
pub mod gallery;
pub mod generate;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
