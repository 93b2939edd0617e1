//! HTML site generation.
//!
//! Takes the gallery manifest (every image with its blur placeholder) and
//! writes the static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): hero card plus a masonry grid of every
//!   photo. Each photo paints its blur placeholder until the scaled image loads.
//!   The page script opens a modal viewer when the URL carries `?photoId=<id>`.
//! - **Viewer pages** (`/p/<id>/index.html`): one standalone page per photo
//!   with previous/next links. Grid links point here, so the gallery works
//!   without JavaScript; with it, clicks open the modal instead.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! └── p/
//!     ├── 0/index.html
//!     ├── 1/index.html
//!     └── ...
//! ```
//!
//! ## Head Metadata
//!
//! Every page carries `og:*` and `twitter:*` tags built from `[site]` in
//! `config.toml`. The social image falls back to the first photo when
//! `site.og_image` is empty; viewer pages use their own photo.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined:
//! - `static/style.css`: masonry grid, modal, viewer (colors injected from config)
//! - `static/gallery.js`: modal, keyboard navigation, last-viewed scroll restore
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, SiteConfig};
use crate::media::{DEFAULT_DELIVERY_BASE, Transform, delivery_url};
use crate::pipeline::{self, BuildError, GalleryManifest};
use crate::types::ImageDescriptor;
use log::info;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] BuildError),
    #[error("Image {0} has no blur placeholder")]
    MissingPlaceholder(String),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

/// Read the manifest at `manifest_path` and write the site to `output_dir`.
///
/// Returns the manifest so callers can report on it without reading it again.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GalleryManifest, GenerateError> {
    let manifest = pipeline::read_manifest(manifest_path)?;
    generate_site(&manifest, output_dir)?;
    Ok(manifest)
}

/// Write the site for an in-memory manifest.
///
/// Refuses manifests with images lacking a placeholder.
pub fn generate_site(manifest: &GalleryManifest, output_dir: &Path) -> Result<(), GenerateError> {
    if let Some(image) = manifest.images.iter().find(|i| {
        i.blur_data_url.as_deref().is_none_or(str::is_empty)
    }) {
        return Err(GenerateError::MissingPlaceholder(image.public_id.clone()));
    }

    let urls = UrlBuilder::new(&manifest.cloud_name, &manifest.config);
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&manifest.config.colors),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;

    // Ids are positions; pages from a larger earlier listing must not survive.
    let pages_dir = output_dir.join("p");
    if pages_dir.exists() {
        fs::remove_dir_all(&pages_dir)?;
    }

    let index_html = render_index(manifest, &urls, &css)?;
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    info!("generated index.html");

    for (idx, image) in manifest.images.iter().enumerate() {
        let prev = idx.checked_sub(1).and_then(|i| manifest.images.get(i));
        let next = manifest.images.get(idx + 1);

        let page_dir = pages_dir.join(image.id.to_string());
        fs::create_dir_all(&page_dir)?;
        let page = render_viewer_page(&manifest.config, &urls, image, prev, next, &css);
        fs::write(page_dir.join("index.html"), page.into_string())?;
    }
    info!("generated {} viewer pages", manifest.images.len());

    Ok(())
}

// ============================================================================
// URLs
// ============================================================================

/// Delivery URLs for the grid and the viewer, bound to one cloud and config.
struct UrlBuilder<'a> {
    cloud_name: &'a str,
    grid: Transform,
    viewer: Transform,
}

impl<'a> UrlBuilder<'a> {
    fn new(cloud_name: &'a str, config: &SiteConfig) -> Self {
        Self {
            cloud_name,
            grid: Transform::scale(config.gallery.grid_width),
            viewer: Transform::scale(config.gallery.viewer_width),
        }
    }

    fn url(&self, image: &ImageDescriptor, transform: &Transform) -> String {
        delivery_url(
            DEFAULT_DELIVERY_BASE,
            self.cloud_name,
            &image.public_id,
            &image.format,
            transform,
        )
    }

    fn grid(&self, image: &ImageDescriptor) -> String {
        self.url(image, &self.grid)
    }

    fn viewer(&self, image: &ImageDescriptor) -> String {
        self.url(image, &self.viewer)
    }

    fn original(&self, image: &ImageDescriptor) -> String {
        self.url(image, &Transform::default())
    }
}

/// Path of the viewer page for `id`.
pub fn viewer_path(id: usize) -> String {
    format!("/p/{id}/")
}

/// Join the site URL and a root-relative path, or `None` when no site URL is set.
fn absolute_url(site_url: &str, path: &str) -> Option<String> {
    if site_url.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

fn blur_style(image: &ImageDescriptor) -> Option<String> {
    image
        .blur_data_url
        .as_ref()
        .map(|url| format!("background-image: url({url});"))
}

/// Per-photo data handed to the page script.
#[derive(Serialize)]
struct ModalPhoto {
    id: usize,
    src: String,
    original: String,
    width: u32,
    height: u32,
    blur: Option<String>,
}

/// JSON for a `<script type="application/json">` block.
///
/// `</` is escaped so a public id can never close the script element.
fn modal_data_json(images: &[ImageDescriptor], urls: &UrlBuilder) -> Result<String, GenerateError> {
    let photos: Vec<ModalPhoto> = images
        .iter()
        .map(|image| ModalPhoto {
            id: image.id,
            src: urls.viewer(image),
            original: urls.original(image),
            width: image.width,
            height: image.height,
            blur: image.blur_data_url.clone(),
        })
        .collect();
    Ok(serde_json::to_string(&photos)?.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// What goes into `<head>` besides the stylesheet.
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    site_name: &'a str,
    lang: &'a str,
    favicon: &'a str,
    url: Option<String>,
    image: Option<String>,
}

impl<'a> PageMeta<'a> {
    fn from_config(config: &'a SiteConfig) -> Self {
        let site = &config.site;
        Self {
            title: &site.title,
            description: &site.description,
            site_name: &site.site_name,
            lang: &site.lang,
            favicon: &site.favicon,
            url: absolute_url(&site.url, "/"),
            image: (!site.og_image.is_empty()).then(|| site.og_image.clone()),
        }
    }
}

/// Renders the base HTML document structure with social card tags.
fn base_document(meta: &PageMeta, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    let card = if meta.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    html! {
        (DOCTYPE)
        html lang=(meta.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                @if !meta.favicon.is_empty() {
                    link rel="icon" href=(meta.favicon);
                }
                @if !meta.description.is_empty() {
                    meta name="description" content=(meta.description);
                }
                meta property="og:type" content="website";
                meta property="og:title" content=(meta.title);
                @if !meta.description.is_empty() {
                    meta property="og:description" content=(meta.description);
                }
                @if !meta.site_name.is_empty() {
                    meta property="og:site_name" content=(meta.site_name);
                }
                @if let Some(url) = &meta.url {
                    meta property="og:url" content=(url);
                }
                @if let Some(image) = &meta.image {
                    meta property="og:image" content=(image);
                }
                meta name="twitter:card" content=(card);
                meta name="twitter:title" content=(meta.title);
                @if !meta.description.is_empty() {
                    meta name="twitter:description" content=(meta.description);
                }
                @if let Some(image) = &meta.image {
                    meta name="twitter:image" content=(image);
                }
                @if let Some(url) = &meta.url {
                    meta name="twitter:url" content=(url);
                }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders one grid entry: link to the viewer page wrapping the scaled image.
fn photo_card(image: &ImageDescriptor, urls: &UrlBuilder, config: &SiteConfig) -> Markup {
    let width = config.gallery.grid_width;
    let height = image.scaled_height(width);

    html! {
        a.photo id={ "photo-" (image.id) } href=(viewer_path(image.id)) data-photo-id=(image.id) {
            img.photo-image
                src=(urls.grid(image))
                width=(width)
                height=(height)
                alt=(config.gallery.alt_text)
                loading="lazy"
                decoding="async"
                style=[blur_style(image)];
        }
    }
}

/// Empty modal shell; the page script fills it from the gallery data.
fn modal_shell() -> Markup {
    html! {
        div.modal id="modal" role="dialog" aria-modal="true" aria-label="Photo viewer" hidden {
            button.modal-close type="button" aria-label="Close" { "×" }
            button.modal-prev type="button" aria-label="Previous photo" { "‹" }
            figure.modal-frame {
                img.modal-image alt="";
            }
            button.modal-next type="button" aria-label="Next photo" { "›" }
            a.modal-original target="_blank" rel="noreferrer" { "Open original" }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: hero card, masonry grid, modal shell.
fn render_index(
    manifest: &GalleryManifest,
    urls: &UrlBuilder,
    css: &str,
) -> Result<Markup, GenerateError> {
    let config = &manifest.config;
    let mut meta = PageMeta::from_config(config);
    if meta.image.is_none() {
        meta.image = manifest.images.first().map(|i| urls.viewer(i));
    }
    let data = modal_data_json(&manifest.images, urls)?;

    let content = html! {
        main.gallery {
            (modal_shell())
            div.masonry {
                section.hero-card {
                    h1 { (config.site.title) }
                    @if !config.site.description.is_empty() {
                        p.hero-description { (config.site.description) }
                    }
                }
                @for image in &manifest.images {
                    (photo_card(image, urls, config))
                }
            }
            @if manifest.images.is_empty() {
                p.empty-gallery { "No photos yet." }
            }
            button.back-to-top type="button" aria-label="Back to top" { "↑" }
        }
        footer.site-footer {
            @if !config.site.site_name.is_empty() {
                p { (config.site.site_name) }
            }
        }
        script id="gallery-data" type="application/json" { (PreEscaped(data)) }
        script { (PreEscaped(JS)) }
    };

    Ok(base_document(&meta, css, None, content))
}

/// Renders a standalone viewer page for one photo.
fn render_viewer_page(
    config: &SiteConfig,
    urls: &UrlBuilder,
    image: &ImageDescriptor,
    prev: Option<&ImageDescriptor>,
    next: Option<&ImageDescriptor>,
    css: &str,
) -> Markup {
    let page_title = format!("{} - {}", config.site.title, image.id + 1);
    let mut meta = PageMeta::from_config(config);
    meta.title = &page_title;
    meta.url = absolute_url(&config.site.url, &viewer_path(image.id));
    meta.image = Some(urls.viewer(image));

    let width = config.gallery.viewer_width;
    let height = image.scaled_height(width);
    let aspect_style = format!("--aspect-ratio: {};", width as f64 / height as f64);

    let content = html! {
        main.viewer data-photo-id=(image.id) {
            figure.viewer-frame style=(aspect_style) {
                img.viewer-image
                    src=(urls.viewer(image))
                    width=(width)
                    height=(height)
                    alt=(config.gallery.alt_text)
                    style=[blur_style(image)];
            }
            nav.viewer-nav {
                @if let Some(prev) = prev {
                    a.viewer-prev href=(viewer_path(prev.id)) rel="prev" { "‹ Previous" }
                }
                a.viewer-back href={ "/#photo-" (image.id) } data-close-to-gallery data-photo-id=(image.id) {
                    "Back to gallery"
                }
                @if let Some(next) = next {
                    a.viewer-next href=(viewer_path(next.id)) rel="next" { "Next ›" }
                }
                a.viewer-original href=(urls.original(image)) target="_blank" rel="noreferrer" {
                    "Open original"
                }
            }
        }
        script { (PreEscaped(JS)) }
    };

    base_document(&meta, css, Some("viewer-page"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn urls(manifest: &GalleryManifest) -> UrlBuilder<'_> {
        UrlBuilder::new(&manifest.cloud_name, &manifest.config)
    }

    fn index_html(manifest: &GalleryManifest) -> String {
        render_index(manifest, &urls(manifest), "").unwrap().into_string()
    }

    #[test]
    fn index_has_social_meta_tags() {
        let manifest = sample_manifest(&["c", "b", "a"]);
        let html = index_html(&manifest);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Gallery</title>"));
        assert!(html.contains(r#"property="og:title" content="Test Gallery""#));
        assert!(html.contains(r#"property="og:description" content="Photos for tests""#));
        assert!(html.contains(r#"name="twitter:card""#));
        assert!(html.contains(r#"property="og:url" content="https://gallery.example.com/""#));
    }

    #[test]
    fn index_og_image_falls_back_to_first_photo() {
        let manifest = sample_manifest(&["c", "b"]);
        let html = index_html(&manifest);
        assert!(html.contains(
            r#"property="og:image" content="https://res.cloudinary.com/demo/image/upload/c_scale,w_1280/c.jpg""#
        ));
        assert!(html.contains("summary_large_image"));
    }

    #[test]
    fn index_og_image_from_config_wins() {
        let mut manifest = sample_manifest(&["c"]);
        manifest.config.site.og_image = "https://example.com/card.svg".to_string();
        let html = index_html(&manifest);
        assert!(html.contains(r#"property="og:image" content="https://example.com/card.svg""#));
    }

    #[test]
    fn index_has_one_card_per_photo() {
        let manifest = sample_manifest(&["c", "b", "a"]);
        let html = index_html(&manifest);

        assert_eq!(count_occurrences(&html, r#"class="photo""#), 3);
        for id in 0..3 {
            assert!(html.contains(&format!(r#"href="/p/{id}/""#)));
            assert!(html.contains(&format!(r#"data-photo-id="{id}""#)));
        }
    }

    #[test]
    fn index_cards_use_grid_transform_and_blur() {
        let manifest = sample_manifest(&["gallery/c"]);
        let html = index_html(&manifest);

        assert!(html.contains(
            "https://res.cloudinary.com/demo/image/upload/c_scale,w_720/gallery/c.jpg"
        ));
        assert!(html.contains(r#"width="720""#));
        // 1200x800 scaled to 720 wide
        assert!(html.contains(r#"height="480""#));
        assert!(html.contains(&format!("background-image: url({BLUR});")));
    }

    #[test]
    fn index_embeds_modal_data() {
        let manifest = sample_manifest(&["c", "b"]);
        let html = index_html(&manifest);
        assert!(html.contains(r#"id="gallery-data""#));
        assert!(html.contains(r#""src":"https://res.cloudinary.com/demo/image/upload/c_scale,w_1280/b.jpg""#));
        assert!(html.contains(r#"id="modal""#));
    }

    #[test]
    fn modal_data_cannot_close_script() {
        let manifest = sample_manifest(&["</script><script>alert(1)"]);
        let json = modal_data_json(&manifest.images, &urls(&manifest)).unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn empty_gallery_renders_notice() {
        let manifest = sample_manifest(&[]);
        let html = index_html(&manifest);
        assert!(html.contains("No photos yet."));
        assert!(!html.contains(r#"property="og:image""#));
        assert!(html.contains(r#"content="summary""#));
    }

    #[test]
    fn titles_are_escaped() {
        let mut manifest = sample_manifest(&["a"]);
        manifest.config.site.title = "<b>bold</b>".to_string();
        let html = index_html(&manifest);
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn viewer_page_links_neighbours() {
        let manifest = sample_manifest(&["c", "b", "a"]);
        let urls = urls(&manifest);
        let images = &manifest.images;

        let middle = render_viewer_page(
            &manifest.config,
            &urls,
            &images[1],
            Some(&images[0]),
            Some(&images[2]),
            "",
        )
        .into_string();
        assert!(middle.contains(r#"href="/p/0/" rel="prev""#));
        assert!(middle.contains(r#"href="/p/2/" rel="next""#));
        assert!(middle.contains(r##"href="/#photo-1""##));
        assert!(middle.contains("<title>Test Gallery - 2</title>"));

        let first =
            render_viewer_page(&manifest.config, &urls, &images[0], None, Some(&images[1]), "")
                .into_string();
        assert!(!first.contains(r#"rel="prev""#));
        assert!(first.contains(r#"rel="next""#));
    }

    #[test]
    fn viewer_page_meta_points_at_photo() {
        let manifest = sample_manifest(&["c"]);
        let page =
            render_viewer_page(&manifest.config, &urls(&manifest), &manifest.images[0], None, None, "")
                .into_string();
        assert!(page.contains(r#"content="https://gallery.example.com/p/0/""#));
        assert!(page.contains(
            r#"property="og:image" content="https://res.cloudinary.com/demo/image/upload/c_scale,w_1280/c.jpg""#
        ));
        assert!(page.contains(r#"class="viewer-page""#));
    }

    #[test]
    fn absolute_url_joins_cleanly() {
        assert_eq!(
            absolute_url("https://x.com/", "/p/1/").as_deref(),
            Some("https://x.com/p/1/")
        );
        assert_eq!(absolute_url("", "/"), None);
    }

    #[test]
    fn generate_site_writes_all_pages() {
        let tmp = TempDir::new().unwrap();
        let manifest = sample_manifest(&["c", "b", "a"]);
        generate_site(&manifest, tmp.path()).unwrap();

        assert!(tmp.path().join("index.html").exists());
        for id in 0..3 {
            assert!(tmp.path().join(format!("p/{id}/index.html")).exists());
        }
        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains("--color-bg"));
    }

    #[test]
    fn regenerating_smaller_gallery_drops_old_viewer_pages() {
        let tmp = TempDir::new().unwrap();
        generate_site(&sample_manifest(&["e", "d", "c", "b", "a"]), tmp.path()).unwrap();
        assert!(tmp.path().join("p/4/index.html").exists());

        let manifest = sample_manifest(&["b", "a"]);
        generate_site(&manifest, tmp.path()).unwrap();

        for id in 2..5 {
            assert!(!tmp.path().join(format!("p/{id}")).exists(), "p/{id} left behind");
        }
        let a = find_image(&manifest, "a");
        let page = fs::read_to_string(tmp.path().join(format!("p/{}/index.html", a.id))).unwrap();
        assert!(page.contains("/a.jpg"));
        assert!(!page.contains(r#"rel="next""#));
    }

    #[test]
    fn viewer_page_zero_width_record_has_finite_aspect() {
        let mut manifest = sample_manifest(&["c"]);
        manifest.config.gallery.viewer_width = 1;
        manifest.images[0].width = 0;
        manifest.images[0].height = 0;

        let page =
            render_viewer_page(&manifest.config, &urls(&manifest), &manifest.images[0], None, None, "")
                .into_string();
        assert!(!page.contains("--aspect-ratio: inf"));
        assert!(page.contains("--aspect-ratio: 1;"));
    }

    #[test]
    fn generate_site_rejects_missing_placeholder() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = sample_manifest(&["c", "b"]);
        manifest.images[1].blur_data_url = None;

        let err = generate_site(&manifest, tmp.path()).unwrap_err();
        assert!(matches!(err, GenerateError::MissingPlaceholder(ref id) if id == "b"));
        assert!(!tmp.path().join("index.html").exists());
    }

    #[test]
    fn generate_reads_manifest_from_disk() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("manifest.json");
        pipeline::write_manifest(&manifest_path, &sample_manifest(&["a"])).unwrap();

        let out = tmp.path().join("dist");
        let manifest = generate(&manifest_path, &out).unwrap();
        assert!(out.join("p/0/index.html").exists());
        assert_eq!(manifest.images[0].public_id, "a");
    }
}
