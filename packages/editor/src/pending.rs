//! # Pending Edit Store
//!
//! Staged edits awaiting remote confirmation, keyed by stable id.
//!
//! ```text
//! stage ──► memory map ──► whole-map JSON ──► CacheStore[key]
//!                 ▲                                │
//!                 └──── load_from_cache (merge) ◄──┘
//! ```
//!
//! Memory is authoritative for the running session: merging a cached queue
//! never overwrites a key already staged in memory. Every write to the
//! cache replaces the whole blob.

use crate::cache::CacheStore;
use crate::element::ElementType;
use crate::errors::EditorResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Staged edits by stable id
pub type PendingQueue = BTreeMap<String, PendingEdit>;

/// An edit accepted into the queue but not yet confirmed remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    /// DOM id of the element when it was staged
    pub element_id: String,
    pub stable_id: String,
    pub element_type: ElementType,
    /// Structural selector, used when the stable id no longer resolves
    pub selector: String,
    pub content: String,
    pub styles: BTreeMap<String, String>,
    pub page_id: u64,
    pub page_identifier: String,
    #[serde(default = "Utc::now")]
    pub staged_at: DateTime<Utc>,
}

pub struct PendingEditStore {
    edits: PendingQueue,
    cache: Box<dyn CacheStore>,
    cache_key: String,
}

impl PendingEditStore {
    pub fn new(cache: Box<dyn CacheStore>, cache_key: impl Into<String>) -> Self {
        Self {
            edits: PendingQueue::new(),
            cache,
            cache_key: cache_key.into(),
        }
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Insert or replace the record for `edit.stable_id` and mirror the queue
    ///
    /// Returns the record it replaced.
    pub fn stage(&mut self, edit: PendingEdit) -> Option<PendingEdit> {
        debug!(stable_id = %edit.stable_id, styles = edit.styles.len(), "Staging edit");
        let replaced = self.edits.insert(edit.stable_id.clone(), edit);
        self.mirror();
        replaced
    }

    pub fn all(&self) -> &PendingQueue {
        &self.edits
    }

    pub fn get(&self, stable_id: &str) -> Option<&PendingEdit> {
        self.edits.get(stable_id)
    }

    pub fn contains(&self, stable_id: &str) -> bool {
        self.edits.contains_key(stable_id)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.edits.keys().cloned().collect()
    }

    /// Drop `edit` after its commit was confirmed
    ///
    /// A record re-staged while the commit was in flight differs from the
    /// committed one and is kept.
    pub fn remove_confirmed(&mut self, edit: &PendingEdit) -> bool {
        if self.edits.get(&edit.stable_id) != Some(edit) {
            debug!(stable_id = %edit.stable_id, "Keeping edit re-staged during commit");
            return false;
        }
        self.edits.remove(&edit.stable_id);
        self.mirror();
        true
    }

    /// Empty memory and the cached mirror
    pub fn clear(&mut self) {
        self.edits.clear();
        if let Err(error) = self.cache.remove(&self.cache_key) {
            warn!(key = %self.cache_key, error = %error, "Failed to clear cached queue");
        }
    }

    /// Merge the cached queue into memory without overwriting staged keys
    ///
    /// An unreadable or corrupt cache counts as empty. Returns the number of
    /// recovered edits.
    pub fn load_from_cache(&mut self) -> usize {
        let raw = match self.cache.get(&self.cache_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(error) => {
                warn!(key = %self.cache_key, error = %error, "Failed to read cached queue");
                return 0;
            }
        };

        let cached = parse_queue(&raw);
        let before = self.edits.len();
        self.edits = merge_queues(std::mem::take(&mut self.edits), cached);
        let recovered = self.edits.len() - before;

        debug!(key = %self.cache_key, recovered, "Loaded pending edits from cache");
        recovered
    }

    /// Replace the cached blob with the current queue
    pub fn persist_to_cache(&mut self) -> EditorResult<()> {
        let json = serde_json::to_string(&self.edits)?;
        self.cache.set(&self.cache_key, &json)?;
        Ok(())
    }

    fn mirror(&mut self) {
        if let Err(error) = self.persist_to_cache() {
            warn!(key = %self.cache_key, error = %error, "Failed to mirror pending queue to cache");
        }
    }
}

impl std::fmt::Debug for PendingEditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingEditStore")
            .field("edits", &self.edits)
            .field("cache_key", &self.cache_key)
            .finish_non_exhaustive()
    }
}

/// Union of two queues by key; `memory` wins on conflict
pub fn merge_queues(memory: PendingQueue, cached: PendingQueue) -> PendingQueue {
    let mut merged = cached;
    merged.extend(memory);
    merged
}

/// Lenient decode of a cached queue
///
/// A blob that is not a JSON object yields an empty queue; individual
/// entries that do not decode are skipped.
pub fn parse_queue(raw: &str) -> PendingQueue {
    let entries: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(error = %error, "Corrupt pending queue in cache, treating as empty");
            return PendingQueue::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<PendingEdit>(value) {
            // Re-key on the record itself so the map invariant holds
            Ok(edit) => Some((edit.stable_id.clone(), edit)),
            Err(error) => {
                warn!(key = %key, error = %error, "Skipping undecodable cached edit");
                None
            }
        })
        .collect()
}
