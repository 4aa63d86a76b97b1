//! Asset URL command.

use serde_json::json;
use wardrobe_core::FileId;
use wardrobe_storefront::{AssetTransform, StorefrontClient};

use super::{CliError, Output};

/// Print the URL for a file, optionally resized.
pub fn asset_url(
    client: &StorefrontClient,
    out: &Output,
    id: &str,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u8>,
    thumbnail: Option<u32>,
) -> Result<(), CliError> {
    let id = FileId::from(id.trim());
    let url = match thumbnail {
        Some(size) => client.thumbnail_url(&id, Some(size)),
        None => client.asset_url(
            &id,
            AssetTransform {
                width,
                height,
                quality,
            },
        ),
    }
    .ok_or(CliError::EmptyFileId)?;

    out.emit(&json!({ "id": id, "url": url.as_str() }), |_| url.to_string())
}
