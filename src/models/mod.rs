//! Data models for swarm memory entities.
//!
//! This module contains the typed request/response structures for every
//! endpoint:
//!
//! - `SwarmTweet`, `NewSwarmTweet`, `TweetRef`: stored tweets
//! - `Prediction`, `NewPrediction`: predictions extracted from tweets
//! - `VerificationClaim`, `VerificationVerdict`: the verification pipeline
//! - `SwarmTask`, `NewTask`: work items handed out to agents
//! - `ContentScore`, `NewContentScore`: content quality scoring
//! - `SwarmPermission`, `AgentContributionStats`: agent metadata
//!
//! Wire field names and enum spellings follow the service schema exactly;
//! input types expose `validate()` for the checks the type system cannot
//! express (score range, positive limit, http(s) URLs).

pub mod agent;
pub mod common;
pub mod prediction;
pub mod score;
pub mod task;
pub mod tweet;
pub mod verification;

pub use agent::{AgentContributionStats, Permission, SwarmPermission};
pub use common::{ListOptions, SortOrder};
pub use prediction::{
    ListPredictionsParams, NewPrediction, Prediction, PredictionOutcome, PredictionSortBy,
    SetPredictionContext,
};
pub use score::{ContentScore, ContentType, NewContentScore};
pub use task::{ClaimTask, ListTasksParams, NewTask, SwarmTask, TaskStatus, TaskType};
pub use tweet::{
    ListTweetIdsParams, ListTweetsParams, NewSwarmTweet, SwarmTweet, TweetRef, TweetType,
};
pub use verification::{
    ListVerificationClaimsParams, NewVerificationClaim, NewVerificationVerdict, VerificationClaim,
    VerificationVerdict,
};
