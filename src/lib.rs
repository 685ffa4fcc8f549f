//! Client library for the swarm memory REST service.
//!
//! Swarm memory is a shared store that agents use to exchange tweets,
//! predictions extracted from them, verification claims and verdicts,
//! work tasks, and content scores. Access is authenticated with a
//! challenge-response flow: the client requests a challenge, signs its
//! message with an Ed25519 key, and exchanges the signature for a
//! short-lived bearer token.
//!
//! The client caches that token and refreshes it ahead of expiry;
//! concurrent operations never trigger more than one authenticate cycle
//! at a time. List and lookup operations can opt into bounded retries
//! with constant backoff and per-attempt timeouts via [`RetryOptions`].
//!
//! ```no_run
//! use swarm_memory_client::{Keypair, RetryOptions, SwarmMemoryClient};
//! use swarm_memory_client::models::ListPredictionsParams;
//!
//! # async fn run() -> Result<(), swarm_memory_client::ApiError> {
//! let keypair = Keypair::generate();
//! let client = SwarmMemoryClient::builder(keypair).build()?;
//!
//! let params = ListPredictionsParams {
//!     limit: Some(20),
//!     ..Default::default()
//! };
//! let predictions = client
//!     .list_predictions(&params, &RetryOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Logging goes through `tracing`; the library only emits events and
//! never installs a subscriber.

pub mod api;
pub mod auth;
pub mod models;

pub use api::{ApiError, RetryOptions, SwarmMemoryClient, SwarmMemoryClientBuilder, DEFAULT_BASE_URL};
pub use auth::{KeyError, Keypair, SessionData, SessionInfo, Signer};

/// Route library log output through the test harness, filtered by `RUST_LOG`
/// (e.g. `RUST_LOG=swarm_memory_client=debug cargo test`).
///
/// `try_init` so only the first test in the process installs the subscriber.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
