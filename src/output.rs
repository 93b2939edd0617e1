//! CLI output formatting for the fetch and render stages.
//!
//! # Information-First Display
//!
//! Every photo is shown by its gallery position and public id, with its
//! dimensions and placeholder size as indented context lines. Paths are
//! secondary.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Gallery: holidays (3 photos)
//! 000 holidays/c
//!     1200x800 jpg
//!     Placeholder: 412 bytes
//! 001 holidays/b
//!     ...
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 000 holidays/c → p/0/index.html
//! 001 holidays/b → p/1/index.html
//!
//! Generated 1 page, 2 viewer pages
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure;
//! no I/O, no side effects.

use crate::config::{ENV_API_KEY, ENV_CLOUD_NAME, ENV_FOLDER, MediaEnv, SiteConfig};
use crate::pipeline::GalleryManifest;
use crate::types::ImageDescriptor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Ids are 0-based; keep them that way in the output so they match `?photoId=`.
fn format_index(id: usize) -> String {
    format!("{:0>3}", id)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Byte length of the decoded payload of a base64 `data:` URL, 0 if it doesn't decode.
fn placeholder_bytes(data_url: &str) -> usize {
    data_url
        .split_once(";base64,")
        .and_then(|(_, payload)| STANDARD.decode(payload).ok())
        .map_or(0, |bytes| bytes.len())
}

fn image_lines(image: &ImageDescriptor) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(image.id), image.public_id),
        format!("{}{}x{} {}", indent(1), image.width, image.height, image.format),
    ];
    match &image.blur_data_url {
        Some(url) => lines.push(format!(
            "{}Placeholder: {} bytes",
            indent(1),
            placeholder_bytes(url)
        )),
        None => lines.push(format!("{}Placeholder: missing", indent(1))),
    }
    lines
}

// ============================================================================
// Fetch stage
// ============================================================================

/// Format the fetched gallery: one entry per photo.
pub fn format_list_output(manifest: &GalleryManifest) -> Vec<String> {
    let mut lines = vec![format!(
        "Gallery: {} ({})",
        manifest.folder,
        plural(manifest.images.len(), "photo", "photos")
    )];
    for image in &manifest.images {
        lines.extend(image_lines(image));
    }
    lines
}

pub fn print_list_output(manifest: &GalleryManifest) {
    for line in format_list_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Render stage
// ============================================================================

/// Format the generated pages.
pub fn format_generate_output(manifest: &GalleryManifest) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];
    for image in &manifest.images {
        lines.push(format!(
            "{} {} → p/{}/index.html",
            format_index(image.id),
            image.public_id,
            image.id
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated 1 page, {}",
        plural(manifest.images.len(), "viewer page", "viewer pages")
    ));
    lines
}

pub fn print_generate_output(manifest: &GalleryManifest) {
    for line in format_generate_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summarise validated configuration. Never prints the API secret.
pub fn format_check_output(env: &MediaEnv, config: &SiteConfig) -> Vec<String> {
    vec![
        "Environment".to_string(),
        format!("{}{}: {}", indent(1), ENV_CLOUD_NAME, env.cloud_name),
        format!("{}{}: {}", indent(1), ENV_API_KEY, env.api_key),
        format!("{}{}: {}", indent(1), ENV_FOLDER, env.folder),
        "Config".to_string(),
        format!("{}Title: {}", indent(1), config.site.title),
        format!("{}Max results: {}", indent(1), config.gallery.max_results),
        format!(
            "{}Placeholder: {}px, q{}, {}",
            indent(1),
            config.placeholder.width,
            config.placeholder.quality,
            config.placeholder.format
        ),
    ]
}

pub fn print_check_output(env: &MediaEnv, config: &SiteConfig) {
    for line in format_check_output(env, config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn list_output_header_and_entries() {
        let manifest = sample_manifest(&["c", "b"]);
        let lines = format_list_output(&manifest);

        assert_eq!(lines[0], "Gallery: gallery (2 photos)");
        assert_eq!(lines[1], "000 c");
        assert_eq!(lines[2], "    1200x800 jpg");
        assert!(lines[3].starts_with("    Placeholder: "));
        assert_eq!(lines[4], "001 b");
    }

    #[test]
    fn list_output_singular() {
        let manifest = sample_manifest(&["c"]);
        assert_eq!(format_list_output(&manifest)[0], "Gallery: gallery (1 photo)");
    }

    #[test]
    fn list_output_flags_missing_placeholder() {
        let mut manifest = sample_manifest(&["c"]);
        manifest.images[0].blur_data_url = None;
        let lines = format_list_output(&manifest);
        assert_eq!(lines[3], "    Placeholder: missing");
    }

    #[test]
    fn placeholder_bytes_counts_decoded_length() {
        // "AAAA" decodes to 3 bytes, "AA==" to 1
        assert_eq!(placeholder_bytes("data:image/jpeg;base64,AAAA"), 3);
        assert_eq!(placeholder_bytes("data:image/jpeg;base64,AAAAAA=="), 4);
        assert_eq!(placeholder_bytes("not a data url"), 0);
        assert_eq!(placeholder_bytes("data:image/jpeg;base64,!!!"), 0);
    }

    #[test]
    fn generate_output_lists_pages() {
        let manifest = sample_manifest(&["c", "b"]);
        let lines = format_generate_output(&manifest);
        assert_eq!(lines[0], "Home → index.html");
        assert_eq!(lines[1], "000 c → p/0/index.html");
        assert_eq!(lines[2], "001 b → p/1/index.html");
        assert_eq!(lines.last().unwrap(), "Generated 1 page, 2 viewer pages");
    }

    #[test]
    fn generate_output_empty_gallery() {
        let manifest = sample_manifest(&[]);
        let lines = format_generate_output(&manifest);
        assert_eq!(lines.last().unwrap(), "Generated 1 page, 0 viewer pages");
    }

    #[test]
    fn check_output_hides_secret() {
        let lines = format_check_output(&test_env(), &SiteConfig::default());
        assert!(lines.iter().any(|l| l.contains("CLOUDINARY_FOLDER: gallery")));
        assert!(lines.iter().all(|l| !l.contains("secret")));
    }
}
