//! Backend schema for the events service and the mapping to and from the
//! flat [`Event`] the rest of the app works with.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::event::{Event, EventUpdate, LabelSet, NewEvent};

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendEvent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kept as sent. Missing or `null` becomes `""`, which renders as an
    /// invalid date instead of failing the whole page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub event_date: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub event_date: String,
    pub description: String,
    pub category: String,
    pub metadata: Metadata,
}

/// Body of `PUT /events/:id`. Absent fields are left alone by the backend,
/// but `metadata` is replaced as a whole, so every variant that touches it
/// sends the complete object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// List envelope. `pagination` is only sent by the paged endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub skip: u64,
    pub has_more: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<BackendEvent> for Event {
    fn from(backend: BackendEvent) -> Self {
        let metadata = backend.metadata.unwrap_or_default();
        let comments = metadata
            .comments
            .filter(|c| !c.is_empty())
            .or(backend.description)
            .unwrap_or_default();

        let labels = match metadata.labels {
            Some(raw) => {
                let sent = raw.len();
                let labels = LabelSet::from(raw);
                if labels.len() != sent {
                    debug!(id = %backend.id, sent, kept = labels.len(), "backend labels normalized");
                }
                labels
            }
            None => LabelSet::new(),
        };

        Event {
            id: backend.id,
            title: backend.title,
            date: backend.event_date,
            labels,
            comments,
            reaction: metadata.reaction,
        }
    }
}

impl From<&NewEvent> for EventPayload {
    fn from(event: &NewEvent) -> Self {
        EventPayload {
            title: event.title.clone(),
            event_date: event.date.clone(),
            // Older clients only read `description`.
            description: event.comments.clone(),
            category: DEFAULT_CATEGORY.to_string(),
            metadata: metadata_for(&event.labels, &event.comments, event.reaction.clone()),
        }
    }
}

impl From<&Event> for EventPayload {
    fn from(event: &Event) -> Self {
        EventPayload::from(&event.to_new_event())
    }
}

impl EventPatch {
    /// Builds the request for `update` against the event as currently held.
    pub fn for_update(current: &Event, update: &EventUpdate) -> Self {
        match update {
            EventUpdate::Full(fields) => {
                let payload = EventPayload::from(fields);
                EventPatch {
                    title: Some(payload.title),
                    description: Some(payload.description),
                    event_date: Some(payload.event_date),
                    category: Some(payload.category),
                    metadata: Some(payload.metadata),
                }
            }
            EventUpdate::Labels(labels) => EventPatch {
                metadata: Some(metadata_for(
                    labels,
                    &current.comments,
                    current.reaction.clone(),
                )),
                ..EventPatch::default()
            },
            EventUpdate::Reaction(reaction) => EventPatch {
                metadata: Some(metadata_for(
                    &current.labels,
                    &current.comments,
                    Some(reaction.clone()),
                )),
                ..EventPatch::default()
            },
        }
    }
}

fn metadata_for(labels: &LabelSet, comments: &str, reaction: Option<String>) -> Metadata {
    Metadata {
        labels: Some(labels.to_vec()),
        reaction,
        comments: Some(comments.to_string()),
    }
}
