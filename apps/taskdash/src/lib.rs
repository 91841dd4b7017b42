#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod store;
pub mod tasks;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::claims::IdentityClaims;
pub use auth::codec::{decode_claims, is_expired, now_epoch_millis};
pub use auth::credentials::CredentialSet;
pub use config::api::ApiConfig;
pub use config::identity::{ConfigSource, IdentityConfig};
pub use error::AuthError;
pub use protocol::client::IdentityClient;
pub use protocol::transport::{HttpTransport, IdentityTransport};
pub use session::manager::{Session, SessionManager, SignUpResult};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use tasks::client::TaskApiClient;
pub use tasks::error::TaskApiError;
pub use tasks::models::{Task, TaskCreate, TaskStats, TaskStatus, TaskUpdate};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
