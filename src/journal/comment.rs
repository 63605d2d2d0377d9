use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// A note left on an event. Fetched per event on demand and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub event_id: String,
    #[serde(default)]
    pub author: String,
    pub content: String,
    /// `None` when the backend left it out or sent something unreadable.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn display_author(&self) -> &str {
        author_or_anonymous(&self.author)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub event_id: String,
    pub content: String,
    pub author: String,
}

impl NewComment {
    pub fn new(event_id: impl Into<String>, content: impl Into<String>, author: &str) -> Self {
        Self {
            event_id: event_id.into(),
            content: content.into(),
            author: author_or_anonymous(author).to_string(),
        }
    }
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|t| t.with_timezone(&Utc))))
}

fn author_or_anonymous(author: &str) -> &str {
    let author = author.trim();
    if author.is_empty() {
        ANONYMOUS_AUTHOR
    } else {
        author
    }
}
