//! Shared test logging for integration test binaries.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Install a test-writer subscriber once per process. Safe to call from
/// every test and from `#[ctor]` hooks.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init();
    });
}
