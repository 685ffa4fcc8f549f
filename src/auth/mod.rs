//! Authentication: challenge signing and session management.
//!
//! This module provides:
//! - `Signer` / `Keypair`: the signing capability used to answer challenges
//! - `SessionManager`: cached session token with proactive refresh and
//!   single-flighted re-authentication
//!
//! Sessions live only in memory; nothing is persisted.

pub mod session;
pub mod signer;

pub(crate) use session::SessionManager;
pub use session::{SessionData, SessionInfo};
pub use signer::{KeyError, Keypair, Signer};
