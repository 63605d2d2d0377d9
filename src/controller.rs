use chrono::{DateTime, TimeZone};
use tracing::{error, info, warn};

use crate::countdown::Countdown;
use crate::journal::cache::THEME_KEY;
use crate::journal::wire::EventPatch;
use crate::journal::{
    Comment, Event, EventStore, EventUpdate, ListQuery, LocalStorage, NewComment, NewEvent,
    StoreError,
};

const COMMENT_PAGE: u32 = 50;

/// Which half of the list a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Today and later.
    Upcoming,
    /// Strictly before today.
    Past,
}

impl Partition {
    pub fn contains(self, countdown: &Countdown) -> bool {
        match self {
            Partition::Upcoming => countdown.diff_days >= 0,
            Partition::Past => countdown.diff_days < 0,
        }
    }
}

/// An event paired with its countdown for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub event: Event,
    pub countdown: Countdown,
}

/// Result of a read. A failed read is never fatal; it carries whatever the
/// list fell back to.
#[derive(Debug)]
pub enum LoadOutcome {
    Fresh { count: usize },
    Fallback { error: StoreError, cached: Option<usize> },
}

/// Sorts ascending by signed day distance. The sort is stable, so events on
/// the same day keep their relative order.
pub fn sort_by_urgency<Tz: TimeZone>(events: &[Event], now: &DateTime<Tz>) -> Vec<Card> {
    let mut cards: Vec<Card> = events
        .iter()
        .map(|event| Card {
            countdown: Countdown::compute(&event.date, now),
            event: event.clone(),
        })
        .collect();
    cards.sort_by_key(|card| card.countdown.diff_days);
    cards
}

/// Owns the in-memory event collection and the local snapshot. The
/// collection only changes after the store confirms a write.
pub struct EventList<S> {
    store: S,
    storage: LocalStorage,
    query: ListQuery,
    events: Vec<Event>,
}

impl<S: EventStore> EventList<S> {
    pub fn new(store: S, storage: LocalStorage, query: ListQuery) -> Self {
        Self {
            store,
            storage,
            query,
            events: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ordered and filtered cards for one "now" snapshot.
    pub fn cards<Tz: TimeZone>(&self, now: &DateTime<Tz>, partition: Partition) -> Vec<Card> {
        sort_by_urgency(&self.events, now)
            .into_iter()
            .filter(|card| partition.contains(&card.countdown))
            .collect()
    }

    pub async fn load(&mut self) -> LoadOutcome {
        match self.store.list(&self.query).await {
            Ok(page) => {
                info!(
                    count = page.items.len(),
                    total = page.pagination.total,
                    "events loaded"
                );
                if page.pagination.has_more {
                    warn!(limit = page.pagination.limit, "more events on the server than one page");
                }
                self.events = page.items;
                self.persist();
                LoadOutcome::Fresh {
                    count: self.events.len(),
                }
            }
            Err(error) => {
                error!(%error, "failed to fetch events");
                let cached = self.storage.load_snapshot().map(|events| {
                    warn!(count = events.len(), "showing cached snapshot");
                    self.events = events;
                    self.events.len()
                });
                LoadOutcome::Fallback { error, cached }
            }
        }
    }

    pub async fn add(&mut self, event: NewEvent) -> Result<Event, StoreError> {
        let created = self.store.create(&event).await?;
        info!(id = %created.id, "event created");
        self.events.push(created.clone());
        self.persist();
        Ok(created)
    }

    /// Applies `update` to the event with `id`. Returns `Ok(false)` without a
    /// round-trip when no such event is held.
    pub async fn update(&mut self, id: &str, update: EventUpdate) -> Result<bool, StoreError> {
        let Some(idx) = self.events.iter().position(|e| e.id == id) else {
            warn!(id, "update for unknown event ignored");
            return Ok(false);
        };

        let patch = EventPatch::for_update(&self.events[idx], &update);
        let saved = self.store.update(id, &patch).await?;

        let slot = &mut self.events[idx];
        match update {
            // Only the reaction is patched locally.
            EventUpdate::Reaction(reaction) => slot.reaction = Some(reaction),
            EventUpdate::Full(_) | EventUpdate::Labels(_) => {
                *slot = Event {
                    id: slot.id.clone(),
                    ..saved
                };
            }
        }
        info!(id, "event updated");
        self.persist();
        Ok(true)
    }

    pub async fn set_reaction(&mut self, id: &str, reaction: &str) -> Result<bool, StoreError> {
        self.update(id, EventUpdate::Reaction(reaction.to_string()))
            .await
    }

    /// Deletes remotely, then drops the matching entry. Returns whether
    /// anything was removed locally.
    pub async fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(id).await?;
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        info!(id, removed, "event deleted");
        self.persist();
        Ok(removed)
    }

    pub async fn comments(&self, event_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.store.comments(event_id, COMMENT_PAGE).await
    }

    pub async fn add_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        self.store.add_comment(&comment).await
    }

    pub fn theme_preference(&self) -> Option<&str> {
        self.storage.get(THEME_KEY)
    }

    pub fn set_theme_preference(&mut self, value: &str) {
        if let Err(e) = self.storage.set(THEME_KEY, value.to_string()) {
            warn!(error = %e, "failed to save theme preference");
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save_snapshot(&self.events) {
            warn!(error = %e, "failed to write event snapshot");
        }
    }
}
