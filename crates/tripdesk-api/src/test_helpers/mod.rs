//! Test helpers
//!
//! In-memory implementations of the catalog, the remote store and the
//! authorizer, so the reconciler and the HTTP surface can be exercised
//! without Postgres or the CDN.

pub mod mock_authorizer;
pub mod mock_catalog;
pub mod mock_remote;

pub use mock_authorizer::{MockAuthorizer, TEST_SESSION_SECRET};
pub use mock_catalog::MockContentCatalog;
pub use mock_remote::MockRemoteStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
