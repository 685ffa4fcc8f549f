//! Agent permissions and contribution statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    InsertAuthorizedAgents,
    InsertPredictions,
    InsertVerificationClaims,
    InsertVerificationVerdicts,
    InsertTasks,
    AddPredictionContext,
}

/// A permission grant for one agent address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmPermission {
    pub created_at: DateTime<Utc>,
    pub id: i64,
    pub permission: Permission,
    pub ss58_address: String,
}

/// Per-agent contribution counters from `GET /agent-contribution-stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContributionStats {
    pub num_predictions_submitted: i64,
    pub num_verification_claims_submitted: i64,
    /// Claims by this agent that a verdict from another agent confirmed.
    pub num_verification_claims_verified_by_other_agents: i64,
    pub num_verification_verdicts_submitted: i64,
    pub wallet_address: String,
}
