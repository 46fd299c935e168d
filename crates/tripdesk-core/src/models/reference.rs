use serde::Serialize;

/// How a content field stores media URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// A single nullable text column, cleared to NULL on cleanup.
    Scalar,
    /// An ordered `text[]` column, matching entries are removed on cleanup.
    Collection,
}

/// A statically known place where a media URL may be stored.
///
/// Table and field names are only ever taken from [`REFERENCE_SITES`], which
/// is what makes it safe for the catalog to splice them into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceSite {
    /// Key reported in the removal summary
    pub key: &'static str,
    pub table: &'static str,
    pub field: &'static str,
    pub cardinality: Cardinality,
}

impl ReferenceSite {
    const fn scalar(key: &'static str, table: &'static str, field: &'static str) -> Self {
        Self {
            key,
            table,
            field,
            cardinality: Cardinality::Scalar,
        }
    }

    const fn collection(key: &'static str, table: &'static str, field: &'static str) -> Self {
        Self {
            key,
            table,
            field,
            cardinality: Cardinality::Collection,
        }
    }
}

/// Every content field that can hold a media delivery URL.
pub const REFERENCE_SITES: [ReferenceSite; 7] = [
    ReferenceSite::scalar("vehicles_image_url", "vehicles", "image_url"),
    ReferenceSite::scalar("blogs_cover_image", "blogs", "cover_image"),
    ReferenceSite::collection("blogs_gallery_rows", "blogs", "gallery"),
    ReferenceSite::scalar("diaries_cover_image", "diaries", "cover_image"),
    ReferenceSite::scalar("diaries_author_avatar", "diaries", "author_avatar"),
    ReferenceSite::collection("diaries_gallery_rows", "diaries", "gallery"),
    ReferenceSite::collection("packages_images_rows", "packages", "images"),
];

/// Remove every entry equal to `url`, keeping the remaining entries in order.
///
/// Returns `None` when nothing matched, meaning the row must not be rewritten.
pub fn without_url(values: &[String], url: &str) -> Option<Vec<String>> {
    let kept: Vec<String> = values.iter().filter(|v| *v != url).cloned().collect();
    (kept.len() != values.len()).then_some(kept)
}
