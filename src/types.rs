//! Shared types passed from the fetch stage to the render stage.
//!
//! These are serialized into the gallery manifest (`manifest.json`) and must
//! read back identically in the `generate` command.

use serde::{Deserialize, Serialize};

/// One photo of the gallery, summarised for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Position in the listing, 0-based and dense. Only stable within one build.
    pub id: usize,
    pub width: u32,
    pub height: u32,
    /// Identifier of the asset in the remote store.
    pub public_id: String,
    /// File extension of the stored asset (`jpg`, `png`, ...).
    pub format: String,
    /// Inline low-resolution preview. `None` until placeholders are generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_data_url: Option<String>,
}

impl ImageDescriptor {
    /// Height when scaled to `target_width`, keeping the aspect ratio.
    ///
    /// Zero-width records (the index occasionally reports them for
    /// non-raster assets) fall back to a 3:2 box. Never below 1.
    pub fn scaled_height(&self, target_width: u32) -> u32 {
        let h = if self.width == 0 {
            target_width as u64 * 2 / 3
        } else {
            (target_width as u64 * self.height as u64 + self.width as u64 / 2) / self.width as u64
        };
        u32::try_from(h.max(1)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(width: u32, height: u32) -> ImageDescriptor {
        ImageDescriptor {
            id: 0,
            width,
            height,
            public_id: "a".to_string(),
            format: "jpg".to_string(),
            blur_data_url: None,
        }
    }

    #[test]
    fn scaled_height_keeps_aspect() {
        assert_eq!(descriptor(1440, 960).scaled_height(720), 480);
        assert_eq!(descriptor(1000, 1500).scaled_height(720), 1080);
    }

    #[test]
    fn scaled_height_rounds() {
        // 720 * 333 / 1000 = 239.76
        assert_eq!(descriptor(1000, 333).scaled_height(720), 240);
    }

    #[test]
    fn scaled_height_zero_width_fallback() {
        assert_eq!(descriptor(0, 0).scaled_height(720), 480);
    }

    #[test]
    fn scaled_height_never_zero() {
        assert_eq!(descriptor(0, 0).scaled_height(1), 1);
        assert_eq!(descriptor(5000, 1).scaled_height(720), 1);
    }

    #[test]
    fn scaled_height_large_values_do_not_overflow() {
        assert_eq!(descriptor(0, 0).scaled_height(u32::MAX), 2_863_311_530);
        assert_eq!(descriptor(1, u32::MAX).scaled_height(u32::MAX), u32::MAX);
    }

    #[test]
    fn missing_blur_is_not_serialized() {
        let json = serde_json::to_string(&descriptor(1, 1)).unwrap();
        assert!(!json.contains("blur_data_url"));
        let back: ImageDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blur_data_url, None);
    }
}
