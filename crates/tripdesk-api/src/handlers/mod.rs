//! HTTP handlers for the back office API.

pub mod media_delete;

pub use media_delete::{delete_media, MediaDeleteResponse};
