//! Transform descriptions and delivery URL construction.
//!
//! A [`Transform`] describes *what* derived version of an asset to request:
//! output format, crop mode, width and quality. It renders to the
//! comma-separated path segment the delivery host understands, e.g.
//! `f_jpg,w_8,q_70` for a blur preview or `c_scale,w_720` for a grid image.
//!
//! Components always render in the fixed order `f`, `c`, `w`, `q` so the same
//! transform always maps to the same URL (and the same CDN cache entry).

use std::fmt;

/// Public delivery host for Cloudinary assets.
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Crop/resize mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    /// Resize to the requested width keeping the aspect ratio.
    Scale,
}

impl Crop {
    fn as_str(self) -> &'static str {
        match self {
            Crop::Scale => "scale",
        }
    }
}

/// A derived-version request for a stored asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
    pub format: Option<String>,
    pub crop: Option<Crop>,
    pub width: Option<u32>,
    pub quality: Option<u32>,
}

impl Transform {
    /// Scaled to `width`, keeping the aspect ratio.
    pub fn scale(width: u32) -> Self {
        Self {
            crop: Some(Crop::Scale),
            width: Some(width),
            ..Default::default()
        }
    }

    /// Tiny preview: forced format, small width, lossy quality.
    pub fn preview(format: &str, width: u32, quality: u32) -> Self {
        Self {
            format: Some(format.to_string()),
            crop: None,
            width: Some(width),
            quality: Some(quality.clamp(1, 100)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.format.is_none() && self.crop.is_none() && self.width.is_none() && self.quality.is_none()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if let Some(format) = &self.format {
            parts.push(format!("f_{format}"));
        }
        if let Some(crop) = self.crop {
            parts.push(format!("c_{}", crop.as_str()));
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{width}"));
        }
        if let Some(quality) = self.quality {
            parts.push(format!("q_{quality}"));
        }
        write!(f, "{}", parts.join(","))
    }
}

/// Build the delivery URL of `public_id` under `transform`.
///
/// ```text
/// {base}/{cloud_name}/image/upload/{transform}/{public_id}.{format}
/// ```
///
/// An empty transform yields the original asset URL.
pub fn delivery_url(
    base: &str,
    cloud_name: &str,
    public_id: &str,
    format: &str,
    transform: &Transform,
) -> String {
    let base = base.trim_end_matches('/');
    if transform.is_empty() {
        format!("{base}/{cloud_name}/image/upload/{public_id}.{format}")
    } else {
        format!("{base}/{cloud_name}/image/upload/{transform}/{public_id}.{format}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_renders_crop_and_width() {
        assert_eq!(Transform::scale(720).to_string(), "c_scale,w_720");
    }

    #[test]
    fn preview_renders_in_fixed_order() {
        assert_eq!(Transform::preview("jpg", 8, 70).to_string(), "f_jpg,w_8,q_70");
    }

    #[test]
    fn preview_clamps_quality() {
        assert_eq!(Transform::preview("png", 8, 0).quality, Some(1));
        assert_eq!(Transform::preview("png", 8, 500).quality, Some(100));
    }

    #[test]
    fn all_components_render() {
        let t = Transform {
            format: Some("webp".into()),
            crop: Some(Crop::Scale),
            width: Some(100),
            quality: Some(50),
        };
        assert_eq!(t.to_string(), "f_webp,c_scale,w_100,q_50");
    }

    #[test]
    fn delivery_url_with_transform() {
        let url = delivery_url(
            DEFAULT_DELIVERY_BASE,
            "demo",
            "gallery/cat",
            "jpg",
            &Transform::scale(720),
        );
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/c_scale,w_720/gallery/cat.jpg"
        );
    }

    #[test]
    fn delivery_url_without_transform() {
        let url = delivery_url("http://host/", "demo", "a", "png", &Transform::default());
        assert_eq!(url, "http://host/demo/image/upload/a.png");
    }
}
