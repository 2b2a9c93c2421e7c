//! Recent-destination list policy.
//!
//! In-memory management only: cap at 5 entries, most-recent-first, de-dupe
//! on insert by place id (when both sides have one) or by query. Actual
//! storage goes through the host's [`KeyValueStore`] as a JSON string.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traits::KeyValueStore;

const MAX_ENTRIES: usize = 5;
const STORE_KEY: &str = "recent_destinations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub query: String,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl RecentEntry {
    pub fn new(query: impl Into<String>, place_id: Option<String>) -> Self {
        Self {
            query: query.into(),
            place_id,
        }
    }

    fn matches(&self, other: &RecentEntry) -> bool {
        match (&self.place_id, &other.place_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.query.eq_ignore_ascii_case(&other.query),
        }
    }
}

/// Most-recent-first destination history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentList {
    entries: Vec<RecentEntry>,
}

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts at the front, removing any duplicate and trimming to the cap.
    pub fn insert(&mut self, entry: RecentEntry) {
        self.entries.retain(|existing| !existing.matches(&entry));
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Loads the persisted list; a missing or unreadable value is an empty
    /// list, never an error.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(STORE_KEY) else {
            return Self::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!(%err, "discarding unreadable recent-destination store");
                Self::new()
            }
        }
    }

    /// Writes the list back through the store seam.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(encoded) => store.put(STORE_KEY, encoded),
            Err(err) => warn!(%err, "failed to encode recent destinations"),
        }
    }
}
