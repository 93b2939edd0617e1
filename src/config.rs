//! Site configuration module.
//!
//! Two sources feed a build:
//!
//! - **`config.toml`** in the source directory: site metadata (title, social
//!   card tags), gallery tuning, placeholder transform and colors. Sparse, merged
//!   on top of stock defaults, unknown keys rejected.
//! - **The environment**: the Cloudinary credential triple and the folder to
//!   publish. These never live in `config.toml` so the file can be committed.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Gallery"
//! description = ""
//! url = ""                   # Canonical site URL, used for og:url / twitter:url
//! site_name = ""
//! og_image = ""              # Social card image; empty = first photo
//! lang = "en"
//! favicon = "/favicon.ico"
//!
//! [gallery]
//! max_results = 400          # Cap on assets listed from the folder (1-400)
//! grid_width = 720           # Width of grid thumbnails (c_scale,w_N)
//! viewer_width = 1280        # Width of the modal / viewer image
//! alt_text = "Photo"
//!
//! [placeholder]
//! width = 8                  # Width of the blur preview transform
//! quality = 70               # 1-100
//! format = "jpg"
//!
//! [colors]
//! background = "#000000"
//! text = "#ffffff"
//! text_muted = "#a3a3a3"
//! accent = "#15803d"
//! ```
//!
//! ## Environment
//!
//! | Variable | Meaning |
//! |---|---|
//! | `CLOUDINARY_CLOUD_NAME` | Account identifier (falls back to `NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME`) |
//! | `CLOUDINARY_API_KEY` | Search API key |
//! | `CLOUDINARY_API_SECRET` | Search API secret |
//! | `CLOUDINARY_FOLDER` | Folder whose assets make up the gallery |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Hard cap imposed by the search API on a single page of results.
pub const MAX_SEARCH_RESULTS: u32 = 400;

pub const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUD_NAME_PUBLIC: &str = "NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME";
pub const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";
pub const ENV_FOLDER: &str = "CLOUDINARY_FOLDER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("Collection folder must not be empty")]
    EmptyFolder,
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page metadata and social card tags.
    pub site: SiteMeta,
    /// Listing and grid settings.
    pub gallery: GalleryConfig,
    /// Blur placeholder transform.
    pub placeholder: PlaceholderConfig,
    /// Page colors.
    pub colors: ColorScheme,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.max_results == 0 || self.gallery.max_results > MAX_SEARCH_RESULTS {
            return Err(ConfigError::Validation(format!(
                "gallery.max_results must be 1-{MAX_SEARCH_RESULTS}"
            )));
        }
        if self.gallery.grid_width == 0 || self.gallery.viewer_width == 0 {
            return Err(ConfigError::Validation(
                "gallery widths must be non-zero".into(),
            ));
        }
        if self.placeholder.width == 0 {
            return Err(ConfigError::Validation(
                "placeholder.width must be non-zero".into(),
            ));
        }
        if self.placeholder.quality == 0 || self.placeholder.quality > 100 {
            return Err(ConfigError::Validation(
                "placeholder.quality must be 1-100".into(),
            ));
        }
        if self.placeholder.format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "placeholder.format must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Page metadata rendered into `<head>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    /// Canonical URL of the published site. Empty omits `og:url`.
    pub url: String,
    pub site_name: String,
    /// Social card image. Empty uses the first photo of the gallery.
    pub og_image: String,
    pub lang: String,
    pub favicon: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            description: String::new(),
            url: String::new(),
            site_name: String::new(),
            og_image: String::new(),
            lang: "en".to_string(),
            favicon: "/favicon.ico".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Maximum number of assets requested from the search index.
    pub max_results: u32,
    /// Pixel width of the scaled images in the masonry grid.
    pub grid_width: u32,
    /// Pixel width of the image shown in the modal and viewer pages.
    pub viewer_width: u32,
    /// Alt text applied to every photo.
    pub alt_text: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_SEARCH_RESULTS,
            grid_width: 720,
            viewer_width: 1280,
            alt_text: "Photo".to_string(),
        }
    }
}

/// Settings for the tiny transform inlined as a blur preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub quality: u32,
    pub format: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 8,
            quality: 70,
            format: "jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Footer, captions and the back-to-top button.
    pub text_muted: String,
    /// Call-to-action and focus rings.
    pub accent: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            text: "#ffffff".to_string(),
            text_muted: "#a3a3a3".to_string(),
            accent: "#15803d".to_string(),
        }
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Credentials and folder for the remote media host.
///
/// Every field is guaranteed non-empty once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaEnv {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

// Keep the secret out of logs and panics.
impl std::fmt::Debug for MediaEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaEnv")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("folder", &self.folder)
            .finish()
    }
}

impl MediaEnv {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup, so tests don't touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cloud_name = get(ENV_CLOUD_NAME)
            .or_else(|| get(ENV_CLOUD_NAME_PUBLIC))
            .ok_or(ConfigError::MissingEnv(ENV_CLOUD_NAME))?;
        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingEnv(ENV_API_KEY))?;
        let api_secret = get(ENV_API_SECRET).ok_or(ConfigError::MissingEnv(ENV_API_SECRET))?;
        let folder = get(ENV_FOLDER).ok_or(ConfigError::MissingEnv(ENV_FOLDER))?;

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            folder,
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// A missing directory or file yields the stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cloud-gal configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Credentials and the folder to publish come from the environment:
#   CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET,
#   CLOUDINARY_FOLDER

# ---------------------------------------------------------------------------
# Page metadata (title, social cards)
# ---------------------------------------------------------------------------
[site]
title = "Gallery"
description = ""

# Canonical URL of the published site, used for og:url and twitter:url.
url = ""
site_name = ""

# Social card image. Leave empty to use the first photo.
og_image = ""
lang = "en"
favicon = "/favicon.ico"

# ---------------------------------------------------------------------------
# Gallery listing and layout
# ---------------------------------------------------------------------------
[gallery]
# Maximum number of assets listed from the folder (1-400).
max_results = 400

# Width of the scaled images in the masonry grid.
grid_width = 720

# Width of the image shown in the modal and on viewer pages.
viewer_width = 1280

alt_text = "Photo"

# ---------------------------------------------------------------------------
# Blur placeholders (tiny inline previews)
# ---------------------------------------------------------------------------
[placeholder]
width = 8
quality = 70
format = "jpg"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#000000"
text = "#ffffff"
text_muted = "#a3a3a3"
accent = "#15803d"
"##
}

/// Generate CSS custom properties from the color config.
pub fn generate_color_css(colors: &ColorScheme) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
}}"#,
        bg = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
    )
}
