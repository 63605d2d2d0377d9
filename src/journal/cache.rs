use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::CacheError;
use super::event::Event;

pub const EVENTS_KEY: &str = "countdown.events";
pub const THEME_KEY: &str = "countdown.theme";

const STORAGE_FILE: &str = "storage.json";

/// Persistent key → string entries, rewritten wholesale on every `set`.
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Opens (or starts) the storage file inside `dir`. An unreadable file is
    /// logged and treated as empty so a corrupt cache never blocks startup.
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt local storage");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Storage that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn flush(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&self.entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), keys = self.entries.len(), "local storage written");
        Ok(())
    }

    pub fn save_snapshot(&mut self, events: &[Event]) -> Result<(), CacheError> {
        let raw = serde_json::to_string(events)?;
        self.set(EVENTS_KEY, raw)
    }

    /// Last successfully stored event list, if any can be read back.
    pub fn load_snapshot(&self) -> Option<Vec<Event>> {
        let raw = self.get(EVENTS_KEY)?;
        match serde_json::from_str(raw) {
            Ok(events) => Some(events),
            Err(e) => {
                warn!(error = %e, "cached snapshot is unreadable");
                None
            }
        }
    }
}
