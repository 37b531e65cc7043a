pub mod builders;

use std::sync::Once;
use std::time::Duration;

use mirrorwatch::logging::env_filter;
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Upper bound for a whole watch-loop test, startup publish included.
pub const LOOP_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test subscriber once per test binary.
///
/// Uses the same filter as the binary, so `MIRRORWATCH_LOG=debug cargo test`
/// shows publish and poll details. Output is captured per test and printed
/// only for failures unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        fmt()
            .with_env_filter(env_filter(None))
            .with_test_writer()
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than [`LOOP_TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(LOOP_TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("watch loop did not finish within {LOOP_TEST_TIMEOUT:?}"))
}
