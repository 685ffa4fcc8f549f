//! Filter and pagination types shared by the list endpoints.

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Common list filter: pagination plus an optional agent/time-window filter.
///
/// `from`/`to` stay strings because the service accepts several timestamp
/// formats there. `None` fields are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListOptions {
    /// Filter by the inserting agent's address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_address: Option<String>,
    /// Start of the time window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// End of the time window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ListOptions {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

pub(crate) fn validate_limit(limit: Option<u32>) -> Result<(), ApiError> {
    if limit == Some(0) {
        return Err(ApiError::Validation("limit must be at least 1".into()));
    }
    Ok(())
}

/// Sort order by ID/insertion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}
