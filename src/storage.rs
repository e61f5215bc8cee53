use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Key the best score is filed under.
pub const HIGH_SCORE_KEY: &str = "turboRacerHigh";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("score store is unavailable")]
    Unavailable,
}

/// Somewhere a single integer can be kept between runs.
pub trait ScoreStore: Send + Sync {
    fn load(&self) -> Result<Option<u32>, StoreError>;
    fn save(&self, value: u32) -> Result<(), StoreError>;
}

type ScoreFile = BTreeMap<String, u32>;

/// Keeps the score in a small JSON object on disk, next to whatever else
/// happens to be filed there.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<ScoreFile, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.read()?.get(HIGH_SCORE_KEY).copied())
    }

    fn save(&self, value: u32) -> Result<(), StoreError> {
        // an unreadable file gets replaced rather than blocking the record
        let mut file = self.read().unwrap_or_default();
        file.insert(HIGH_SCORE_KEY.to_string(), value);
        let text = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Process-lifetime store, also used when the disk is not an option.
#[derive(Default)]
pub struct MemoryStore {
    value: Mutex<Option<u32>>,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Mutex::new(Some(value)),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        self.value
            .lock()
            .map(|v| *v)
            .map_err(|_| StoreError::Unavailable)
    }

    fn save(&self, value: u32) -> Result<(), StoreError> {
        let mut slot = self.value.lock().map_err(|_| StoreError::Unavailable)?;
        *slot = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "turbo-racer-{tag}-{}-{nanos}.json",
            std::process::id()
        ))
    }

    #[test]
    fn missing_file_means_no_score_yet() {
        let store = JsonFileStore::new(scratch_path("missing"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn saved_score_survives_a_new_store() {
        let path = scratch_path("roundtrip");
        JsonFileStore::new(&path).save(420).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), Some(420));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(HIGH_SCORE_KEY));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn other_keys_in_the_file_are_kept() {
        let path = scratch_path("shared");
        fs::write(&path, r#"{"volume": 7}"#).unwrap();
        let store = JsonFileStore::new(&path);
        store.save(30).unwrap();

        let raw: BTreeMap<String, u32> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("volume"), Some(&7));
        assert_eq!(raw.get(HIGH_SCORE_KEY), Some(&30));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn garbage_file_reports_json_error() {
        let path = scratch_path("garbage");
        fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unwritable_location_reports_io_error() {
        let dir = scratch_path("dir");
        fs::create_dir_all(&dir).unwrap();
        // a directory cannot be written as a file
        let err = JsonFileStore::new(&dir).save(1).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_store_keeps_last_value() {
        let store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), None);
        store.save(5).unwrap();
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), Some(9));
        assert_eq!(MemoryStore::with_value(3).load().unwrap(), Some(3));
    }
}
