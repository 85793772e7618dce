use crate::error::PersistenceError;
use crate::models::scan_record::ScanRecord;
use crate::services::storage::HistoryStorage;

/// Storage key the history is persisted under
pub const HISTORY_KEY: &str = "plate_scan_history";

/// Maximum number of scans kept
pub const MAX_HISTORY: usize = 10;

/// Bounded, newest-first scan history mirrored to local storage.
///
/// Every mutation writes the full list back. Storage failures are logged and
/// swallowed: a broken store degrades to an empty or unsaved history, never to
/// a user-facing error.
pub struct HistoryStore {
    records: Vec<ScanRecord>,
    storage: Box<dyn HistoryStorage>,
}

impl HistoryStore {
    /// Restore the persisted history, or start empty if it is absent or unreadable.
    pub fn load(storage: Box<dyn HistoryStorage>) -> Self {
        let records = match Self::read_records(storage.as_ref()) {
            Ok(mut records) => {
                if records.len() > MAX_HISTORY {
                    tracing::warn!(
                        stored = records.len(),
                        max = MAX_HISTORY,
                        "persisted history over capacity, trimming"
                    );
                    records.truncate(MAX_HISTORY);
                }
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load scan history, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = records.len(), "scan history loaded");
        Self { records, storage }
    }

    fn read_records(storage: &dyn HistoryStorage) -> Result<Vec<ScanRecord>, PersistenceError> {
        match storage.read(HISTORY_KEY)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the in-memory list.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            tracing::warn!(error = %e, "failed to persist scan history");
        }
    }

    fn try_save(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.records)?;
        self.storage.write(HISTORY_KEY, &json)
    }

    /// Add a scan at the front, dropping the oldest beyond [`MAX_HISTORY`].
    pub fn prepend(&mut self, record: ScanRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_HISTORY);
        self.save();
    }

    /// Delete the scan with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);

        if self.records.len() == before {
            return false;
        }
        self.save();
        true
    }

    /// Empty the history and drop the persisted entry.
    pub fn clear(&mut self) {
        self.records.clear();
        if let Err(e) = self.storage.remove(HISTORY_KEY) {
            tracing::warn!(error = %e, "failed to remove persisted scan history");
        }
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ScanRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
