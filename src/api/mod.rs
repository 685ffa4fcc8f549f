//! REST API layer for the swarm memory service.
//!
//! This module provides the `SwarmMemoryClient` facade, the normalizing
//! request executor behind it, the opt-in retry wrapper, and the crate's
//! error taxonomy.
//!
//! Authenticated calls carry a bearer token obtained through the
//! challenge-response flow in [`crate::auth`].

pub mod client;
pub mod error;
pub(crate) mod executor;
pub mod retry;

pub use client::{SwarmMemoryClient, SwarmMemoryClientBuilder, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use retry::RetryOptions;
