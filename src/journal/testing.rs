//! In-memory [`EventStore`] for controller and app tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;

use super::comment::{Comment, NewComment};
use super::error::StoreError;
use super::event::{Event, NewEvent};
use super::store::{EventStore, ListQuery, Page};
use super::wire::{EventPatch, Pagination};

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,
    comments: Mutex<Vec<Comment>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
    pub patches: Mutex<Vec<(String, EventPatch)>>,
}

impl MemoryStore {
    pub fn with_events(events: Vec<Event>) -> Self {
        let store = Self::default();
        *store.events.lock().unwrap() = events;
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                operation,
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(())
    }
}

pub fn event(id: &str, date: &str) -> Event {
    Event {
        id: id.to_string(),
        title: format!("event {id}"),
        date: date.to_string(),
        labels: Default::default(),
        comments: String::new(),
        reaction: None,
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Event>, StoreError> {
        self.check("list events")?;
        let events = self.events.lock().unwrap();
        let limit = query.limit.unwrap_or(u32::MAX) as usize;
        let items: Vec<Event> = events.iter().take(limit).cloned().collect();
        Ok(Page {
            pagination: Pagination {
                total: events.len() as u64,
                limit: limit as u64,
                skip: 0,
                has_more: items.len() < events.len(),
            },
            items,
        })
    }

    async fn get(&self, id: &str) -> Result<Event, StoreError> {
        self.check("fetch event")?;
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::Status {
                operation: "fetch event",
                status: StatusCode::NOT_FOUND,
            })
    }

    async fn create(&self, event: &NewEvent) -> Result<Event, StoreError> {
        self.check("create event")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Event {
            id: format!("mem-{id}"),
            title: event.title.clone(),
            date: event.date.clone(),
            labels: event.labels.clone(),
            comments: event.comments.clone(),
            reaction: event.reaction.clone(),
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Event, StoreError> {
        self.check("update event")?;
        self.patches
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));

        let mut events = self.events.lock().unwrap();
        let event = events.iter_mut().find(|e| e.id == id).ok_or(StoreError::Status {
            operation: "update event",
            status: StatusCode::NOT_FOUND,
        })?;
        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(date) = &patch.event_date {
            event.date = date.clone();
        }
        if let Some(meta) = &patch.metadata {
            event.labels = meta.labels.clone().unwrap_or_default().into();
            event.comments = meta.comments.clone().unwrap_or_default();
            event.reaction = meta.reaction.clone();
        }
        Ok(event.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check("delete event")?;
        self.events.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }

    async fn upcoming(&self) -> Result<Vec<Event>, StoreError> {
        self.check("fetch upcoming events")?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        _limit: Option<u32>,
        _skip: Option<u32>,
    ) -> Result<Vec<Event>, StoreError> {
        self.check("fetch events in range")?;
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }

    async fn comments(&self, event_id: &str, limit: u32) -> Result<Vec<Comment>, StoreError> {
        self.check("fetch comments")?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.event_id == event_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        self.check("post comment")?;
        let mut comments = self.comments.lock().unwrap();
        let created = Comment {
            id: format!("c-{}", comments.len()),
            event_id: comment.event_id.clone(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: Some(DateTime::<Utc>::UNIX_EPOCH),
        };
        comments.push(created.clone());
        Ok(created)
    }
}
