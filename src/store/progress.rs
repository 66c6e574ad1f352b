use std::sync::Arc;

use crate::store::kv::KeyValueStore;
use crate::store::schema::{Mark, PROGRESS_KEY, ProgressMap, VerbStats, VerbStatus};

/// Owns the progress map and keeps the persisted copy in step with it.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    progress: ProgressMap,
    hydrated: bool,
}

impl ProgressStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            progress: ProgressMap::default(),
            hydrated: false,
        }
    }

    /// Load the persisted map. Missing or corrupt data leaves the map empty.
    /// Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.hydrated {
            return;
        }

        self.progress = match self.kv.get(PROGRESS_KEY) {
            Ok(Some(json)) => ProgressMap::decode(&json).unwrap_or_else(|| {
                log::warn!("Ignoring malformed {PROGRESS_KEY} entry, starting empty");
                ProgressMap::default()
            }),
            Ok(None) => ProgressMap::default(),
            Err(e) => {
                log::warn!("Failed to read {PROGRESS_KEY}: {e}");
                ProgressMap::default()
            }
        };
        self.hydrated = true;
        log::debug!(
            "Hydrated progress for {} pair(s)",
            self.progress.pair_codes().count()
        );
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Record `mark` for a verb and persist the whole map.
    ///
    /// Returns false without touching storage when there is no pair code, or
    /// when hydration has not happened yet (a write then would clobber the
    /// persisted history).
    pub fn set_status(&mut self, code: &str, verb_id: u32, mark: Mark) -> bool {
        if code.is_empty() {
            return false;
        }
        if !self.hydrated {
            log::warn!("Dropping status change for {code}/{verb_id}: progress not loaded yet");
            return false;
        }

        self.progress.record(code, verb_id, mark);
        self.persist();
        true
    }

    pub fn get_status(&self, code: &str, verb_id: u32) -> VerbStatus {
        self.progress.status(code, verb_id)
    }

    pub fn get_stats(&self, code: &str, total_verbs: usize) -> VerbStats {
        self.progress.stats(code, total_verbs)
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    fn persist(&self) {
        let json = match self.progress.encode() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode progress: {e}");
                return;
            }
        };
        if let Err(e) = self.kv.set(PROGRESS_KEY, &json) {
            log::warn!("Failed to persist progress: {e}");
        }
    }
}
