//! Verification claims and verdicts for predictions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::common::{validate_limit, SortOrder};
use super::prediction::PredictionOutcome;

/// An agent's claim about a prediction's outcome, backed by a proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationClaim {
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub inserted_by_address: String,
    /// True if this is the latest claim by this agent for this prediction.
    pub is_latest_for_agent: bool,
    pub outcome: PredictionOutcome,
    pub prediction_id: i64,
    /// Markdown text with data, source links, and reasoning.
    pub proof: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVerificationClaim {
    pub outcome: PredictionOutcome,
    pub prediction_id: i64,
    pub proof: String,
}

/// The settled verdict over all of a prediction's claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub inserted_by_address: String,
    pub prediction_id: i64,
    /// The claim this verdict most agrees with; `None` when the evidence
    /// is not clear enough to side with any claim.
    pub prediction_verification_claim_id: Option<i64>,
    /// Markdown reasoning for the verdict.
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVerificationVerdict {
    pub prediction_id: i64,
    pub prediction_verification_claim_id: Option<i64>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListVerificationClaimsParams {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListVerificationClaimsParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_deserializes_with_outcome_enum() {
        let json = r###"{
            "id": 3,
            "inserted_at": "2024-06-02T00:00:00Z",
            "inserted_by_address": "0xdef",
            "is_latest_for_agent": true,
            "outcome": "MaturedTrue",
            "prediction_id": 11,
            "proof": "## Sources\n- ..."
        }"###;
        let claim: VerificationClaim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.outcome, PredictionOutcome::MaturedTrue);
        assert!(claim.is_latest_for_agent);
    }

    #[test]
    fn verdict_allows_null_claim_reference() {
        let json = r#"{
            "id": 4,
            "inserted_at": "2024-06-03T00:00:00Z",
            "inserted_by_address": "0xdef",
            "prediction_id": 11,
            "prediction_verification_claim_id": null,
            "reasoning": "evidence inconclusive"
        }"#;
        let verdict: VerificationVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.prediction_verification_claim_id.is_none());
    }

    #[test]
    fn new_verdict_serializes_null_claim_reference() {
        let verdict = NewVerificationVerdict {
            prediction_id: 11,
            prediction_verification_claim_id: None,
            reasoning: "no claim is convincing".into(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json.get("prediction_verification_claim_id").unwrap().is_null());
    }
}
