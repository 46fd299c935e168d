//! Remote key resolution
//!
//! Works out which CDN object a catalog row points at, and which resource
//! kinds to try when deleting it.

use crate::models::{MediaAsset, MediaType, ResourceKind};
use regex::Regex;
use std::sync::LazyLock;

/// `.../upload/[v<digits>/]<key>[.<ext>][?query|#fragment]`
static DELIVERY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"upload/(?:v\d+/)?([^?#]+?)(?:\.[^./?#]+)?(?:[?#].*)?$")
        .expect("delivery path pattern is valid")
});

/// Derive the CDN key from a delivery URL.
///
/// Takes the path after the literal `upload/`, drops a leading version segment
/// and strips the file extension. Returns `None` for URLs that were never
/// served by the CDN.
pub fn parse_public_id_from_url(url: &str) -> Option<String> {
    let captures = DELIVERY_PATH.captures(url)?;
    let key = captures.get(1)?.as_str().trim_matches('/');
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Resolve the key to delete: a non-empty stored `public_id` is returned as
/// is, otherwise the key is parsed from the URL.
pub fn resolve_remote_key(asset: &MediaAsset) -> Option<String> {
    match asset.public_id.as_deref() {
        Some(public_id) if !public_id.is_empty() => Some(public_id.to_string()),
        _ => parse_public_id_from_url(&asset.url),
    }
}

/// Order in which resource kinds are tried for a catalog media type.
pub fn resource_kind_preferences(media_type: MediaType) -> &'static [ResourceKind] {
    match media_type {
        MediaType::Pdf => &[ResourceKind::Raw, ResourceKind::Image],
        MediaType::Video => &[ResourceKind::Video],
        MediaType::Image => &[ResourceKind::Image, ResourceKind::Raw],
    }
}
