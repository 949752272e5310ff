#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use battlegrid::config::Config;
use battlegrid::state::AppState;

/// Upper bound for anything a test waits on (live refreshes, spawned transmits).
pub const WAIT: Duration = Duration::from_secs(5);

/// Configuration for an isolated in-memory store with no transmit delay.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        log_level: "warn".to_string(),
        transmit_delay: Duration::ZERO,
        ..Config::default()
    }
}

/// Fresh state over a private in-memory store.
pub async fn test_state() -> AppState {
    AppState::open(test_config())
        .await
        .expect("in-memory store should open")
}

/// Await `future`, failing the test if it takes longer than [`WAIT`].
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT, future)
        .await
        .expect("timed out waiting for the store")
}
