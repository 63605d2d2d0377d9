use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed palette a card's reaction is picked from.
pub const REACTIONS: [&str; 8] = ["❤️", "😍", "🥳", "🎉", "🔥", "👍", "😊", "💯"];

/// A recorded milestone as the app sees it.
///
/// `date` keeps the backend's string untouched; parsing happens in
/// [`crate::countdown::Countdown`] so a malformed date still shows up as a
/// card with an "invalid date" label instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
}

/// An event that has not been assigned an id by the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub labels: LabelSet,
    pub comments: String,
    pub reaction: Option<String>,
}

impl Event {
    pub fn to_new_event(&self) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            date: self.date.clone(),
            labels: self.labels.clone(),
            comments: self.comments.clone(),
            reaction: self.reaction.clone(),
        }
    }
}

/// What a single update round-trip is allowed to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventUpdate {
    /// Everything the add/edit dialog owns.
    Full(NewEvent),
    Labels(LabelSet),
    Reaction(String),
}

impl EventUpdate {
    /// Picks the narrowest update that turns `current` into `fields`. An
    /// edit that only touched the chips goes out as a labels update.
    pub fn from_edit(current: &Event, fields: NewEvent) -> Self {
        let mut relabeled = current.to_new_event();
        relabeled.labels = fields.labels.clone();
        if relabeled == fields && fields.labels != current.labels {
            EventUpdate::Labels(fields.labels)
        } else {
            EventUpdate::Full(fields)
        }
    }
}

/// Ordered, duplicate-free list of labels.
///
/// Equality is case-sensitive and insertion order is preserved. Entries are
/// trimmed and blank candidates are refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the trimmed candidate is empty or already present.
    pub fn insert(&mut self, candidate: &str) -> bool {
        let label = candidate.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.0.push(label.to_string());
        true
    }

    /// Removes the first exact match.
    pub fn remove(&mut self, label: &str) -> bool {
        match self.0.iter().position(|l| l == label) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(labels: LabelSet) -> Self {
        labels.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label.as_ref());
        }
        set
    }
}

/// Draft state behind the add/edit dialog. Nothing here is persisted until
/// [`EventDraft::validate`] succeeds and the result is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub labels: LabelSet,
    pub comments: String,
    /// Carried through an edit so saving the dialog keeps the card's reaction.
    pub reaction: Option<String>,
}

impl EventDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            labels: LabelSet::new(),
            comments: String::new(),
            reaction: None,
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            labels: event.labels.clone(),
            comments: event.comments.clone(),
            reaction: event.reaction.clone(),
        }
    }

    pub fn add_label(&mut self, candidate: &str) -> bool {
        self.labels.insert(candidate)
    }

    pub fn remove_label(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    /// Submit stays disabled while this is false.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<NewEvent, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        // Dates loaded from the backend may carry a time component; the
        // dialog only needs the calendar day to be readable.
        let day = date.get(..10).unwrap_or(date);
        if NaiveDate::parse_from_str(day, DATE_FORMAT).is_err() {
            return Err(ValidationError::InvalidDate(date.to_string()));
        }

        Ok(NewEvent {
            title: self.title.clone(),
            date: date.to_string(),
            labels: self.labels.clone(),
            comments: self.comments.clone(),
            reaction: self.reaction.clone(),
        })
    }
}
