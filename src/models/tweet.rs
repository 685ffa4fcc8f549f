//! Tweets stored in swarm memory.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

use super::common::{validate_limit, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweetType {
    Post,
    Reply,
    Quote,
    Retweet,
}

impl fmt::Display for TweetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TweetType::Post => "post",
            TweetType::Reply => "reply",
            TweetType::Quote => "quote",
            TweetType::Retweet => "retweet",
        };
        write!(f, "{name}")
    }
}

/// A tweet to insert.
///
/// The nullable snowflake references are part of the wire schema and are
/// sent as explicit `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSwarmTweet {
    /// The author's 64-bit user snowflake ID (as a decimal string), if available.
    pub author_twitter_user_id: Option<String>,
    /// The author's username, without the leading '@'.
    pub author_twitter_username: String,
    /// Conversation/thread identifier, if provided by the upstream API.
    pub conversation_id: Option<String>,
    pub full_text: String,
    /// If this tweet is a reply, the parent tweet ID.
    pub in_reply_to_tweet_id: Option<String>,
    /// If this tweet quotes another, the quoted tweet ID.
    pub quoted_tweet_id: Option<String>,
    /// Raw JSON payload as returned by the upstream API for this tweet.
    pub raw_json: String,
    /// If this tweet is a retweet, the retweeted tweet ID.
    pub retweeted_tweet_id: Option<String>,
    /// The tweet's 64-bit snowflake ID (as a decimal string).
    pub tweet_id: String,
    pub tweet_timestamp: DateTime<Utc>,
    pub tweet_type: TweetType,
    /// The canonical URL of the tweet.
    pub url: String,
}

impl NewSwarmTweet {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ApiError::Validation(format!(
                "tweet url must be an http(s) URL, got {:?}",
                self.url
            )));
        }
        Ok(())
    }
}

/// A stored tweet, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmTweet {
    /// The internal row ID of the tweet.
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    /// Address of the agent who inserted the tweet.
    pub inserted_by_address: String,
    pub author_twitter_user_id: Option<String>,
    pub author_twitter_username: String,
    pub conversation_id: Option<String>,
    pub full_text: String,
    pub in_reply_to_tweet_id: Option<String>,
    pub quoted_tweet_id: Option<String>,
    pub raw_json: String,
    pub retweeted_tweet_id: Option<String>,
    pub tweet_id: String,
    pub tweet_timestamp: DateTime<Utc>,
    pub tweet_type: TweetType,
    pub url: String,
}

/// Internal row ID plus snowflake ID, from `GET /tweets/ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRef {
    pub id: i64,
    pub tweet_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListTweetsParams {
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
    /// Filter by author username, with or without '@', case-insensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_twitter_username: Option<String>,
    /// Case-insensitive text search over content fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListTweetsParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListTweetIdsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_twitter_username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tweet() -> NewSwarmTweet {
        NewSwarmTweet {
            author_twitter_user_id: Some("12345".into()),
            author_twitter_username: "forecaster".into(),
            conversation_id: None,
            full_text: "BTC will hit 100k by December".into(),
            in_reply_to_tweet_id: None,
            quoted_tweet_id: None,
            raw_json: "{}".into(),
            retweeted_tweet_id: None,
            tweet_id: "1800000000000000000".into(),
            tweet_timestamp: "2024-06-01T12:00:00Z".parse().unwrap(),
            tweet_type: TweetType::Post,
            url: "https://x.com/forecaster/status/1800000000000000000".into(),
        }
    }

    #[test]
    fn tweet_type_wire_spelling_is_lowercase() {
        assert_eq!(serde_json::to_string(&TweetType::Retweet).unwrap(), r#""retweet""#);
        assert_eq!(TweetType::Quote.to_string(), "quote");
    }

    #[test]
    fn nullable_references_serialize_as_explicit_null() {
        let json = serde_json::to_value(sample_tweet()).unwrap();
        assert!(json.get("in_reply_to_tweet_id").unwrap().is_null());
        assert!(json.get("conversation_id").unwrap().is_null());
    }

    #[test]
    fn url_must_be_http() {
        let mut tweet = sample_tweet();
        assert!(tweet.validate().is_ok());

        tweet.url = "ftp://example.com/1".into();
        assert!(matches!(tweet.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn stored_tweet_deserializes() {
        let json = r#"{
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
        }"#;
        let tweet: SwarmTweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.id, 9);
        assert_eq!(tweet.tweet_type, TweetType::Post);
    }
}
