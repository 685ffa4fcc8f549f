//! Work items the swarm hands out to agents.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::common::validate_limit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Claimed,
    Started,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Claimed => "Claimed",
            TaskStatus::Started => "Started",
            TaskStatus::Completed => "Completed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    FindAllPredictionsOfUser,
    FindAllPredictionsOfTopic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmTask {
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub priority: i64,
    pub status: TaskStatus,
    pub task_type: TaskType,
    /// Task argument: a username or a topic, depending on `task_type`.
    pub value: String,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub priority: i64,
    pub task_type: TaskType,
    pub value: String,
}

/// Body for the claim and complete endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTask {
    pub task_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListTasksParams {
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
    pub sort_by_priority_desc: bool,
}

impl ListTasksParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_type_wire_spellings_are_pascal_case() {
        assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), r#""Pending""#);
        assert_eq!(
            serde_json::to_string(&TaskType::FindAllPredictionsOfTopic).unwrap(),
            r#""FindAllPredictionsOfTopic""#
        );
        assert_eq!(TaskStatus::Claimed.to_string(), "Claimed");
    }

    #[test]
    fn task_deserializes_with_nullable_timestamps() {
        let json = r#"{
            "id": 5,
            "inserted_at": "2024-06-01T00:00:00Z",
            "priority": 10,
            "status": "Pending",
            "task_type": "FindAllPredictionsOfUser",
            "value": "forecaster",
            "claimed_at": null,
            "completed_at": null
        }"#;
        let task: SwarmTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.claimed_at.is_none());
    }
}
