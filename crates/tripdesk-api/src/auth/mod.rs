//! Back office authorization
//!
//! Every admin route takes an [`AdminContext`]: a verified session whose user
//! has an admin profile.

pub mod authorizer;
pub mod extractor;
pub mod session;

pub use authorizer::{Authorizer, SessionAuthorizer};
pub use extractor::AdminContext;
pub use session::{SessionClaims, SessionUser, SessionVerifier, SESSION_COOKIE};
