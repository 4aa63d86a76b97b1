//! Directus asset URLs.
//!
//! Files are served from `{base}/assets/{id}`; resizing is requested through
//! query parameters and done by Directus.

use url::Url;
use wardrobe_core::FileId;

use crate::config::join_path;

/// Edge length used for thumbnails when none is given.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 300;

/// JPEG/WebP quality used for thumbnails.
pub const THUMBNAIL_QUALITY: u8 = 80;

/// Optional transformation parameters for an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
}

impl AssetTransform {
    /// Square thumbnail at the default quality.
    #[must_use]
    pub const fn thumbnail(size: u32) -> Self {
        Self {
            width: Some(size),
            height: Some(size),
            quality: Some(THUMBNAIL_QUALITY),
        }
    }
}

/// URL of an asset, or `None` for an empty file ID.
#[must_use]
pub fn asset_url(base: &Url, id: &FileId, transform: AssetTransform) -> Option<Url> {
    if id.is_empty() {
        return None;
    }

    let mut url = join_path(base, &format!("/assets/{id}"));
    {
        let mut query = url.query_pairs_mut();
        if let Some(width) = transform.width {
            query.append_pair("width", &width.to_string());
        }
        if let Some(height) = transform.height {
            query.append_pair("height", &height.to_string());
        }
        if let Some(quality) = transform.quality {
            query.append_pair("quality", &quality.to_string());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Some(url)
}

/// Square thumbnail URL. `size` defaults to 300.
#[must_use]
pub fn thumbnail_url(base: &Url, id: &FileId, size: Option<u32>) -> Option<Url> {
    asset_url(
        base,
        id,
        AssetTransform::thumbnail(size.unwrap_or(DEFAULT_THUMBNAIL_SIZE)),
    )
}
