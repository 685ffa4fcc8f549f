//! API client for the swarm memory REST service.
//!
//! This module provides the `SwarmMemoryClient` facade. Every operation
//! follows the same shape: validate the input, ensure a valid session,
//! build the request, and hand it to the executor - through the retry
//! wrapper for the operations that accept `RetryOptions`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::auth::{SessionInfo, SessionManager, Signer};
use crate::models::{
    AgentContributionStats, ClaimTask, ContentScore, ListOptions, ListPredictionsParams,
    ListTasksParams, ListTweetIdsParams, ListTweetsParams, ListVerificationClaimsParams,
    NewContentScore, NewPrediction, NewSwarmTweet, NewTask, NewVerificationClaim,
    NewVerificationVerdict, Prediction, SetPredictionContext, SwarmPermission, SwarmTask,
    SwarmTweet, TweetRef, VerificationClaim, VerificationVerdict,
};

use super::error::ApiError;
use super::executor::RequestExecutor;
use super::retry::{self, RetryOptions};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the swarm memory service.
pub const DEFAULT_BASE_URL: &str = "https://memory.sension.torus.directory/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while still failing in bounded time.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the swarm memory REST service.
///
/// Clone is cheap - the HTTP connection pool and session state are shared
/// between clones, so clones of one client also share its session token.
///
/// Every data operation authenticates first (uniformly - including the
/// content-score and permission listings), refreshing the cached session
/// token when it is absent or within 15 minutes of expiry.
#[derive(Clone)]
pub struct SwarmMemoryClient {
    base_url: String,
    executor: RequestExecutor,
    session: SessionManager,
}

/// Builder for [`SwarmMemoryClient`].
pub struct SwarmMemoryClientBuilder {
    signer: Arc<dyn Signer>,
    base_url: String,
    request_timeout: Duration,
}

impl SwarmMemoryClientBuilder {
    /// Override the service base URL (no trailing slash needed).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request HTTP timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SwarmMemoryClient, ApiError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| ApiError::Network {
                url: base_url.clone(),
                source: err,
            })?;
        let executor = RequestExecutor::new(client);
        let session = SessionManager::new(executor.clone(), self.signer, base_url.clone());
        Ok(SwarmMemoryClient {
            base_url,
            executor,
            session,
        })
    }
}

// Private response envelopes live at the bottom of the file.

impl SwarmMemoryClient {
    /// Start building a client around a signing identity.
    pub fn builder(signer: impl Signer + 'static) -> SwarmMemoryClientBuilder {
        SwarmMemoryClientBuilder {
            signer: Arc::new(signer),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    // ===== Session Operations =====

    /// POST /auth/logout - invalidate the current session token.
    ///
    /// The cached token is cleared once the remote call succeeds; the next
    /// authenticated operation runs a fresh authenticate cycle.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/auth/logout", self.base_url);
        info!("logging out");
        self.executor
            .post_no_content::<()>(&url, None, self.session.headers().await?)
            .await?;
        self.session.invalidate().await;
        Ok(())
    }

    /// POST /auth/logout-all - invalidate every session for this identity.
    /// Returns the number of sessions invalidated.
    pub async fn logout_all(&self) -> Result<u64, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/auth/logout-all", self.base_url);
        info!("logging out of all sessions");
        let count = self
            .executor
            .post::<u64, ()>(&url, None, self.session.headers().await?)
            .await?;
        self.session.invalidate().await;
        Ok(count)
    }

    /// GET /auth/sessions - list active sessions for this identity.
    pub async fn sessions(&self) -> Result<Vec<SessionInfo>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/auth/sessions", self.base_url);
        info!("fetching sessions");
        self.executor
            .get(&url, self.session.headers().await?)
            .await
    }

    // ===== Agent Operations =====

    /// GET /agent-contribution-stats
    pub async fn agent_contribution_stats(&self) -> Result<Vec<AgentContributionStats>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/agent-contribution-stats", self.base_url);
        info!("fetching agent contribution stats");
        let envelope: AgentContributionStatsEnvelope = self
            .executor
            .get(&url, self.session.headers().await?)
            .await?;
        Ok(envelope.agent_contribution_stats)
    }

    /// GET /permissions/list
    pub async fn list_permissions(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<SwarmPermission>, ApiError> {
        options.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/permissions/list", self.base_url);
        info!(options = ?options, "listing permissions");
        self.executor
            .get_with_query(&url, options, self.session.headers().await?)
            .await
    }

    // ===== Content Score Operations =====

    /// GET /content-scores/list
    pub async fn list_content_scores(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<ContentScore>, ApiError> {
        options.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/content-scores/list", self.base_url);
        info!(options = ?options, "listing content scores");
        self.executor
            .get_with_query(&url, options, self.session.headers().await?)
            .await
    }

    /// POST /content-scores/insert
    ///
    /// The service's documented response schema is null, so nothing is
    /// returned beyond success.
    pub async fn insert_content_score(&self, score: &NewContentScore) -> Result<(), ApiError> {
        score.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/content-scores/insert", self.base_url);
        info!(content_id = score.content_id, "inserting content score");
        self.executor
            .post_no_content(&url, Some(score), self.session.headers().await?)
            .await
    }

    // ===== Prediction Operations =====

    /// POST /predictions/insert
    pub async fn insert_prediction(
        &self,
        prediction: &NewPrediction,
    ) -> Result<Prediction, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/predictions/insert", self.base_url);
        info!(tweet_id = %prediction.tweet_id, "inserting prediction");
        let inserted: Prediction = self
            .executor
            .post(&url, Some(prediction), self.session.headers().await?)
            .await?;
        debug!(prediction = ?inserted, "inserted prediction");
        Ok(inserted)
    }

    /// GET /predictions/list
    pub async fn list_predictions(
        &self,
        params: &ListPredictionsParams,
        retry: &RetryOptions,
    ) -> Result<Vec<Prediction>, ApiError> {
        params.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/predictions/list", self.base_url);
        let url = url.as_str();
        info!(params = ?params, "listing predictions");
        // Headers are rebuilt per attempt so a token refreshed elsewhere
        // mid-retry is picked up.
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_with_query(url, params, headers).await
        })
        .await
    }

    /// GET /predictions/{id} - `None` when the prediction does not exist.
    pub async fn prediction_by_id(
        &self,
        id: i64,
        retry: &RetryOptions,
    ) -> Result<Option<Prediction>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/predictions/{}", self.base_url, id);
        let url = url.as_str();
        let id = id.to_string();
        let id = id.as_str();
        info!(id, "fetching prediction");
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_by_id("Prediction", id, url, headers).await
        })
        .await
    }

    /// POST /predictions/set-context
    pub async fn set_prediction_context(
        &self,
        context: &SetPredictionContext,
    ) -> Result<Prediction, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/predictions/set-context", self.base_url);
        info!(prediction_id = context.prediction_id, "setting prediction context");
        self.executor
            .post(&url, Some(context), self.session.headers().await?)
            .await
    }

    // ===== Verification Operations =====

    /// POST /prediction-verification-claims/insert
    ///
    /// Returns the updated prediction, with this claim included.
    pub async fn insert_verification_claim(
        &self,
        claim: &NewVerificationClaim,
    ) -> Result<Prediction, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-claims/insert", self.base_url);
        info!(
            prediction_id = claim.prediction_id,
            outcome = %claim.outcome,
            "inserting verification claim"
        );
        self.executor
            .post(&url, Some(claim), self.session.headers().await?)
            .await
    }

    /// GET /prediction-verification-claims/list
    pub async fn list_verification_claims(
        &self,
        params: &ListVerificationClaimsParams,
        retry: &RetryOptions,
    ) -> Result<Vec<VerificationClaim>, ApiError> {
        params.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-claims/list", self.base_url);
        let url = url.as_str();
        info!(params = ?params, "listing verification claims");
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_with_query(url, params, headers).await
        })
        .await
    }

    /// GET /prediction-verification-claims/{id}
    pub async fn verification_claim_by_id(
        &self,
        id: i64,
    ) -> Result<Option<VerificationClaim>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-claims/{}", self.base_url, id);
        info!(id, "fetching verification claim");
        self.executor
            .get_by_id(
                "VerificationClaim",
                &id.to_string(),
                &url,
                self.session.headers().await?,
            )
            .await
    }

    /// POST /prediction-verification-verdicts/upsert
    pub async fn upsert_verification_verdict(
        &self,
        verdict: &NewVerificationVerdict,
    ) -> Result<VerificationVerdict, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-verdicts/upsert", self.base_url);
        info!(prediction_id = verdict.prediction_id, "upserting verification verdict");
        debug!(verdict = ?verdict, "verdict payload");
        self.executor
            .post(&url, Some(verdict), self.session.headers().await?)
            .await
    }

    /// GET /prediction-verification-verdicts/list
    pub async fn list_verification_verdicts(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<VerificationVerdict>, ApiError> {
        options.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-verdicts/list", self.base_url);
        info!(options = ?options, "listing verification verdicts");
        self.executor
            .get_with_query(&url, options, self.session.headers().await?)
            .await
    }

    /// GET /prediction-verification-verdicts/{id}
    pub async fn verification_verdict_by_id(
        &self,
        id: i64,
    ) -> Result<Option<VerificationVerdict>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/prediction-verification-verdicts/{}", self.base_url, id);
        info!(id, "fetching verification verdict");
        self.executor
            .get_by_id(
                "VerificationVerdict",
                &id.to_string(),
                &url,
                self.session.headers().await?,
            )
            .await
    }

    // ===== Task Operations =====

    /// GET /tasks/list
    pub async fn list_tasks(&self, params: &ListTasksParams) -> Result<Vec<SwarmTask>, ApiError> {
        params.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tasks/list", self.base_url);
        info!(params = ?params, "listing tasks");
        self.executor
            .get_with_query(&url, params, self.session.headers().await?)
            .await
    }

    /// POST /tasks/claim
    pub async fn claim_task(&self, task_id: i64) -> Result<SwarmTask, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tasks/claim", self.base_url);
        info!(task_id, "claiming task");
        self.executor
            .post(&url, Some(&ClaimTask { task_id }), self.session.headers().await?)
            .await
    }

    /// POST /tasks/complete
    pub async fn complete_task(&self, task_id: i64) -> Result<SwarmTask, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tasks/complete", self.base_url);
        info!(task_id, "completing task");
        self.executor
            .post(&url, Some(&ClaimTask { task_id }), self.session.headers().await?)
            .await
    }

    /// POST /tasks/insert
    pub async fn insert_task(&self, task: &NewTask) -> Result<SwarmTask, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tasks/insert", self.base_url);
        info!(task = ?task, "inserting task");
        self.executor
            .post(&url, Some(task), self.session.headers().await?)
            .await
    }

    // ===== Tweet Operations =====

    /// POST /tweets/insert
    pub async fn insert_tweets(
        &self,
        tweets: &[NewSwarmTweet],
    ) -> Result<Vec<SwarmTweet>, ApiError> {
        for tweet in tweets {
            tweet.validate()?;
        }
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tweets/insert", self.base_url);
        info!(count = tweets.len(), "inserting tweets");
        self.executor
            .post(&url, Some(tweets), self.session.headers().await?)
            .await
    }

    /// GET /tweets/{id} - `None` when the tweet does not exist.
    pub async fn tweet_by_id(
        &self,
        id: &str,
        retry: &RetryOptions,
    ) -> Result<Option<SwarmTweet>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tweets/{}", self.base_url, id);
        let url = url.as_str();
        info!(id, "fetching tweet");
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_by_id("Tweet", id, url, headers).await
        })
        .await
    }

    /// GET /tweets/list
    pub async fn list_tweets(
        &self,
        params: &ListTweetsParams,
        retry: &RetryOptions,
    ) -> Result<Vec<SwarmTweet>, ApiError> {
        params.validate()?;
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tweets/list", self.base_url);
        let url = url.as_str();
        info!(params = ?params, "listing tweets");
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_with_query(url, params, headers).await
        })
        .await
    }

    /// GET /tweets/ids
    pub async fn list_tweet_ids(
        &self,
        params: &ListTweetIdsParams,
        retry: &RetryOptions,
    ) -> Result<Vec<TweetRef>, ApiError> {
        self.session.ensure_authenticated().await?;
        let url = format!("{}/tweets/ids", self.base_url);
        let url = url.as_str();
        info!(params = ?params, "listing tweet ids");
        retry::with_retry(retry, || async move {
            let headers = self.session.headers().await?;
            self.executor.get_with_query(url, params, headers).await
        })
        .await
    }
}

// ============================================================================
// Private API response shapes
// ============================================================================

#[derive(Debug, serde::Deserialize)]
struct AgentContributionStatsEnvelope {
    agent_contribution_stats: Vec<AgentContributionStats>,
}
