pub mod cache;
pub mod comment;
pub mod error;
pub mod event;
pub mod store;
#[cfg(test)]
pub mod testing;
pub mod wire;

pub use cache::LocalStorage;
pub use comment::{Comment, NewComment};
pub use error::StoreError;
pub use event::{Event, EventDraft, EventUpdate, NewEvent, REACTIONS};
pub use store::{EventStore, HttpStore, ListQuery};
