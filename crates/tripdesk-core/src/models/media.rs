use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kind of media registered in the catalog.
///
/// The catalog stores the kind as free text. Anything that is not `pdf` or
/// `video` is treated as an image, which is also what the CDN assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Pdf,
    Video,
}

impl MediaType {
    /// Parse the catalog's `type` column. Unknown or missing values map to `Image`.
    pub fn from_column(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("pdf") => MediaType::Pdf,
            Some("video") => MediaType::Video,
            _ => MediaType::Image,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Pdf => write!(f, "pdf"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// Resource kind the CDN files an object under. Deletes are addressed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Raw,
    Video,
}

impl ResourceKind {
    /// Path segment used by the CDN admin API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
            ResourceKind::Video => "video",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A media catalog row as read by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Opaque catalog identifier
    pub id: String,
    /// Canonical delivery URL, as stored in content rows
    pub url: String,
    /// CDN key, when recorded at upload time
    pub public_id: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}
