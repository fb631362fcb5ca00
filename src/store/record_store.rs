use tracing::{debug, warn};

use crate::{tags::EmojiTag, utils::clock::Clock};

use super::{entities::CheckinRecord, slot_storage::SlotStorage};

/// Name of the persisted slot. Kept from the original data layout so existing
/// data keeps loading.
pub const STORAGE_KEY: &str = "recordedTimes";

/// The store never holds more than this many check-ins.
pub const MAX_RECORDS: usize = 5;

/// Bounded, newest-first sequence of check-ins, mirrored into a [SlotStorage]
/// slot after every mutation.
///
/// The in-memory sequence is the source of truth for rendering. Storage
/// failures in either direction are logged and swallowed: a failed load
/// starts the store empty, a failed persist leaves the mutation in memory and
/// the user only notices a check-in that doesn't stick across restarts.
pub struct RecordStore<S> {
    storage: S,
    records: Vec<CheckinRecord>,
    clock: Box<dyn Clock>,
}

impl<S: SlotStorage> RecordStore<S> {
    /// Initializes the store from the persisted slot. Absent or unparsable
    /// data yields an empty store, never an error.
    pub fn load(storage: S, clock: Box<dyn Clock>) -> Self {
        let records = match storage.read(STORAGE_KEY) {
            Ok(Some(value)) => match serde_json::from_str::<Vec<CheckinRecord>>(&value) {
                Ok(mut records) => {
                    records.truncate(MAX_RECORDS);
                    records
                }
                Err(e) => {
                    warn!("Persisted check-ins are not valid json, starting empty: {e}");
                    vec![]
                }
            },
            Ok(None) => vec![],
            Err(e) => {
                warn!("Failed to read persisted check-ins, starting empty: {e:?}");
                vec![]
            }
        };

        Self {
            storage,
            records,
            clock,
        }
    }

    /// Newest first.
    pub fn records(&self) -> &[CheckinRecord] {
        &self.records
    }

    /// Records a check-in at the current moment and keeps only the newest
    /// [MAX_RECORDS] entries. Equal timestamps from rapid inserts are fine,
    /// the newest insertion still goes to the front.
    pub fn insert(&mut self, tag: EmojiTag) -> &[CheckinRecord] {
        let record = CheckinRecord::at(self.clock.time(), tag);
        debug!("Recording check-in {record:?}");
        self.records.insert(0, record);
        self.records.truncate(MAX_RECORDS);
        self.persist();
        &self.records
    }

    /// Replaces the tag of the check-in at `index`, leaving its timestamp and
    /// formatted time untouched. An index outside the sequence is ignored,
    /// the view never produces one.
    pub fn retag(&mut self, index: usize, tag: EmojiTag) {
        match self.records.get_mut(index) {
            Some(record) => {
                record.emoji = tag.glyph().to_owned();
                self.persist();
            }
            None => {
                warn!("Retag index {index} is out of range for {} records", self.records.len());
            }
        }
    }

    /// Empties the store and drops the persisted slot. Confirmation happens
    /// in the view before this is called.
    pub fn clear(&mut self) {
        self.records.clear();
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            warn!("Failed to remove persisted check-ins: {e:?}");
        }
    }

    fn persist(&mut self) {
        let value = match serde_json::to_string(&self.records) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to encode check-ins: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(STORAGE_KEY, &value) {
            warn!("Failed to persist check-ins: {e:?}");
        }
    }
}
