use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Read, Write},
    path::PathBuf,
};

use anyhow::Result;
use fs4::fs_std::FileExt;
use tracing::debug;

/// Interface for abstracting the persisted key-value slot. Only the record
/// store talks to it, and tests substitute it to inject read and write
/// failures.
#[cfg_attr(test, mockall::automock)]
pub trait SlotStorage {
    /// Reads the value stored under `key`. A key that was never written reads
    /// as `None`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the slot entirely. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// The main realization of [SlotStorage]. Every key lives in its own file
/// under the application state directory. File locks guard against a watch
/// session and a one-shot command touching the slot at the same time.
pub struct FileSlotStorage {
    slot_dir: PathBuf,
}

impl FileSlotStorage {
    pub fn new(slot_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&slot_dir)?;

        Ok(Self { slot_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.slot_dir.join(format!("{key}.json"))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        debug!("Reading slot {path:?}");
        let mut file = match File::open(&path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value);
        file.unlock()?;
        result?;

        Ok(Some(value))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        debug!("Writing slot {path:?}");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        file.lock_exclusive()?;
        let result = file.write_all(value.as_bytes()).and_then(|_| file.flush());
        file.unlock()?;
        result?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{FileSlotStorage, SlotStorage};

    #[test]
    fn write_then_read_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let mut storage = FileSlotStorage::new(dir.path().to_owned())?;

        storage.write("recordedTimes", "[1,2,3]")?;

        assert_eq!(storage.read("recordedTimes")?.as_deref(), Some("[1,2,3]"));
        Ok(())
    }

    #[test]
    fn absent_key_reads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let storage = FileSlotStorage::new(dir.path().to_owned())?;

        assert_eq!(storage.read("recordedTimes")?, None);
        Ok(())
    }

    #[test]
    fn write_replaces_previous_value() -> Result<()> {
        let dir = tempdir()?;
        let mut storage = FileSlotStorage::new(dir.path().to_owned())?;

        storage.write("recordedTimes", "[\"a long first value\"]")?;
        storage.write("recordedTimes", "[]")?;

        assert_eq!(storage.read("recordedTimes")?.as_deref(), Some("[]"));
        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let mut storage = FileSlotStorage::new(dir.path().to_owned())?;

        storage.write("recordedTimes", "[]")?;
        storage.remove("recordedTimes")?;
        storage.remove("recordedTimes")?;

        assert_eq!(storage.read("recordedTimes")?, None);
        Ok(())
    }
}
