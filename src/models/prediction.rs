//! Predictions extracted from tweets.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::common::{validate_limit, SortOrder};
use super::tweet::SwarmTweet;
use super::verification::{VerificationClaim, VerificationVerdict};

/// Outcome of the prediction verification process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionOutcome {
    NotMatured,
    MaturedTrue,
    MaturedFalse,
    MaturedMostlyTrue,
    Invalid,
    MissingContext,
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionOutcome::NotMatured => "NotMatured",
            PredictionOutcome::MaturedTrue => "MaturedTrue",
            PredictionOutcome::MaturedFalse => "MaturedFalse",
            PredictionOutcome::MaturedMostlyTrue => "MaturedMostlyTrue",
            PredictionOutcome::Invalid => "Invalid",
            PredictionOutcome::MissingContext => "MissingContext",
        };
        write!(f, "{name}")
    }
}

/// A stored prediction, with its tweet and verification history embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    /// Surrounding context, e.g. the preceding tweets in a thread.
    pub context: Option<String>,
    pub inserted_at: DateTime<Utc>,
    pub inserted_by_address: String,
    /// The prediction, extracted verbatim from the tweet text.
    pub prediction: String,
    pub topic: String,
    pub tweet: SwarmTweet,
    pub verification_claims: Vec<VerificationClaim>,
    pub verification_verdict: Option<VerificationVerdict>,
}

/// A prediction to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Must be extracted verbatim from the tweet text.
    pub prediction: String,
    /// The task that led to finding this prediction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    /// High-level topic (politics, sports, economy, tech, ...); may be empty.
    pub topic: String,
    /// Database identifier of the containing tweet.
    pub tweet_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPredictionContext {
    pub prediction_id: i64,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSortBy {
    Id,
    TwitterUsername,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListPredictionsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Case-insensitive text search over content fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<PredictionSortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListPredictionsParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_wire_spelling_is_pascal_case() {
        assert_eq!(
            serde_json::to_string(&PredictionOutcome::MaturedMostlyTrue).unwrap(),
            r#""MaturedMostlyTrue""#
        );
        assert_eq!(PredictionOutcome::NotMatured.to_string(), "NotMatured");
    }

    #[test]
    fn sort_by_wire_spelling_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&PredictionSortBy::TwitterUsername).unwrap(),
            r#""twitter_username""#
        );
    }

    #[test]
    fn prediction_deserializes_with_embedded_tweet_and_claims() {
        let json = r#"{
            "id": 11,
            "context": null,
            "inserted_at": "2024-06-01T13:00:00Z",
            "inserted_by_address": "0xabc",
            "prediction": "BTC will hit 100k by December",
            "topic": "economy",
            "tweet": {
                "id": 9,
                "inserted_at": "2024-06-01T12:05:00Z",
                "inserted_by_address": "0xabc",
                "author_twitter_user_id": null,
                "author_twitter_username": "forecaster",
                "conversation_id": null,
                "full_text": "BTC will hit 100k by December",
                "in_reply_to_tweet_id": null,
                "quoted_tweet_id": null,
                "raw_json": "{}",
                "retweeted_tweet_id": null,
                "tweet_id": "1800000000000000000",
                "tweet_timestamp": "2024-06-01T12:00:00Z",
                "tweet_type": "post",
                "url": "https://x.com/forecaster/status/1800000000000000000"
            },
            "verification_claims": [],
            "verification_verdict": null
        }"#;
        let prediction: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.id, 11);
        assert_eq!(prediction.tweet.id, 9);
        assert!(prediction.verification_claims.is_empty());
        assert!(prediction.verification_verdict.is_none());
    }

    #[test]
    fn new_prediction_omits_absent_optionals() {
        let input = NewPrediction {
            context: None,
            prediction: "it will rain".into(),
            task_id: None,
            topic: "weather".into(),
            tweet_id: "42".into(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("context").is_none());
        assert!(json.get("task_id").is_none());
    }
}
