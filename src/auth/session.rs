//! Session management for challenge-response authentication.
//!
//! The session manager owns the token/expiry pair, refreshes it ahead of
//! expiry, and single-flights concurrent refreshes: callers that observe
//! a stale session while a cycle is already running await that cycle and
//! share its outcome, including failure. At most one challenge/verify
//! round trip is in flight per client instance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::api::error::ApiError;
use crate::api::executor::RequestExecutor;

use super::signer::Signer;

/// Minutes before expiry at which a token is treated as already stale.
/// Refreshing early avoids a token expiring mid-request.
const REFRESH_WINDOW_MINUTES: i64 = 15;

/// A cached bearer credential.
///
/// Token and expiry always travel together; the manager stores them in a
/// single `Option` so they are set and cleared atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// True once the token is inside the proactive-refresh window.
    pub fn needs_refresh(&self) -> bool {
        self.expires_at - Utc::now() < Duration::minutes(REFRESH_WINDOW_MINUTES)
    }
}

/// An active session as reported by `GET /auth/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub last_accessed: Option<DateTime<Utc>>,
}

// Wire DTOs for the three-step authenticate cycle. The challenge exists
// only within one cycle and is never persisted.

#[derive(Debug, Serialize)]
struct ChallengeRequest {
    address: String,
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    challenge_token: String,
    expires_at: DateTime<Utc>,
    message: String,
}

#[derive(Debug, Serialize)]
struct VerifyRequest {
    challenge_token: String,
    signature: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    session_token: String,
    expires_at: DateTime<Utc>,
}

/// What concurrent waiters see when a shared cycle fails. The cause is
/// logged where it occurred; callers only ever get the generic error.
#[derive(Debug, Clone, Copy)]
struct AuthFailure;

type AuthCycle = Shared<BoxFuture<'static, Result<SessionData, AuthFailure>>>;

#[derive(Default)]
struct SessionState {
    session: Option<SessionData>,
    in_flight: Option<AuthCycle>,
}

/// Owns the authentication state machine and supplies auth headers.
///
/// The session cell is the only shared mutable state in the client and is
/// mutated exclusively here, by the authenticate and invalidate paths.
#[derive(Clone)]
pub(crate) struct SessionManager {
    executor: RequestExecutor,
    signer: Arc<dyn Signer>,
    base_url: String,
    state: Arc<Mutex<SessionState>>,
}

impl SessionManager {
    pub(crate) fn new(executor: RequestExecutor, signer: Arc<dyn Signer>, base_url: String) -> Self {
        Self {
            executor,
            signer,
            base_url,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Guarantee a currently-valid session token, refreshing if the cached
    /// one is absent or inside the refresh window.
    ///
    /// Performs no network I/O when the cached token is still fresh. On
    /// cycle failure the session reverts to unauthenticated and
    /// [`ApiError::AuthenticationFailed`] propagates; there is no implicit
    /// retry here.
    pub(crate) async fn ensure_authenticated(&self) -> Result<(), ApiError> {
        let cycle = {
            let mut state = self.state.lock().await;
            if let Some(session) = &state.session {
                if !session.needs_refresh() {
                    return Ok(());
                }
                debug!(expires_at = %session.expires_at, "session token near expiry");
            }
            match &state.in_flight {
                Some(cycle) => cycle.clone(),
                None => {
                    info!(address = %self.signer.address(), "refreshing session token");
                    let cycle = self.spawn_cycle();
                    state.in_flight = Some(cycle.clone());
                    cycle
                }
            }
        };

        cycle
            .await
            .map(|_| ())
            .map_err(|_| ApiError::AuthenticationFailed)
    }

    /// Header set for the current session: empty when unauthenticated,
    /// otherwise bearer token plus JSON content type.
    pub(crate) async fn headers(&self) -> Result<HeaderMap, ApiError> {
        let state = self.state.lock().await;
        let mut headers = HeaderMap::new();
        if let Some(session) = &state.session {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", session.token))
                .map_err(|_| ApiError::AuthenticationFailed)?;
            headers.insert(header::AUTHORIZATION, bearer);
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        Ok(headers)
    }

    /// Drop the cached session, restoring the unauthenticated state.
    pub(crate) async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.session = None;
        debug!("session invalidated");
    }

    #[cfg(test)]
    pub(crate) async fn current_session(&self) -> Option<SessionData> {
        self.state.lock().await.session.clone()
    }

    #[cfg(test)]
    pub(crate) async fn set_session(&self, session: SessionData) {
        self.state.lock().await.session = Some(session);
    }

    /// Build the shared single-flight future for one authenticate cycle.
    ///
    /// The future stores its own result and clears the in-flight handle as
    /// its final step, so completion and bookkeeping happen atomically
    /// under the state lock.
    fn spawn_cycle(&self) -> AuthCycle {
        let executor = self.executor.clone();
        let signer = Arc::clone(&self.signer);
        let base_url = self.base_url.clone();
        let state = Arc::clone(&self.state);

        async move {
            let result = authenticate(&executor, signer.as_ref(), &base_url).await;
            let mut state = state.lock().await;
            state.in_flight = None;
            match result {
                Ok(session) => {
                    state.session = Some(session.clone());
                    info!("authentication successful");
                    Ok(session)
                }
                Err(err) => {
                    state.session = None;
                    error!(error = %err, "authentication failed");
                    Err(AuthFailure)
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// The fixed three-step cycle: challenge, sign, verify.
async fn authenticate(
    executor: &RequestExecutor,
    signer: &dyn Signer,
    base_url: &str,
) -> Result<SessionData, ApiError> {
    let url = format!("{base_url}/auth/challenge");
    let request = ChallengeRequest {
        address: signer.address(),
    };
    debug!("requesting auth challenge");
    let challenge: ChallengeResponse = executor
        .post(&url, Some(&request), HeaderMap::new())
        .await?;
    debug!(
        challenge_token = %challenge.challenge_token,
        challenge_expires_at = %challenge.expires_at,
        "received challenge"
    );

    // Unprefixed hex over the raw message bytes.
    let signature = hex::encode(signer.sign(challenge.message.as_bytes()));

    let url = format!("{base_url}/auth/verify");
    let request = VerifyRequest {
        challenge_token: challenge.challenge_token,
        signature,
    };
    debug!("verifying challenge");
    let verified: VerifyResponse = executor
        .post(&url, Some(&request), HeaderMap::new())
        .await?;

    Ok(SessionData {
        token: verified.session_token,
        expires_at: verified.expires_at,
    })
}
