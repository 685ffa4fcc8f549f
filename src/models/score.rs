//! Quality scores agents assign to stored content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// The kind of content a score refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Prediction,
    PredictionVerificationClaim,
    PredictionVerificationVerdict,
}

/// A score to insert. `score` runs from 0 (as bad as it can be) to
/// 1 (as good as it can be).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentScore {
    pub content_id: i64,
    pub content_type: ContentType,
    /// Why the score was given, e.g. "duplicate" or "tweet contains no prediction".
    pub reasoning: String,
    pub score: f64,
}

impl NewContentScore {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(0.0..=1.0).contains(&self.score) {
            return Err(ApiError::Validation(format!(
                "score must be between 0 and 1, got {}",
                self.score
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentScore {
    pub content_id: i64,
    pub content_type: ContentType,
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub inserted_by_address: String,
    pub reasoning: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(score: f64) -> NewContentScore {
        NewContentScore {
            content_id: 11,
            content_type: ContentType::Prediction,
            reasoning: "duplicate".into(),
            score,
        }
    }

    #[test]
    fn content_type_wire_spelling_is_pascal_case() {
        assert_eq!(
            serde_json::to_string(&ContentType::PredictionVerificationClaim).unwrap(),
            r#""PredictionVerificationClaim""#
        );
    }

    #[test]
    fn score_must_be_within_unit_interval() {
        assert!(sample(0.0).validate().is_ok());
        assert!(sample(1.0).validate().is_ok());
        assert!(sample(0.5).validate().is_ok());
        assert!(matches!(sample(1.5).validate(), Err(ApiError::Validation(_))));
        assert!(matches!(sample(-0.1).validate(), Err(ApiError::Validation(_))));
    }
}
