pub mod admin_profile;

pub use admin_profile::{AdminProfile, AdminProfileRepository};
