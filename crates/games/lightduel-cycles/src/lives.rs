use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lightduel_core::error::LightDuelError;
use lightduel_core::host::LivesStore;
use lightduel_core::player::Side;

/// Store key holding a side's remaining lives.
pub fn lives_key(side: Side) -> &'static str {
    match side {
        Side::One => "player_one_lives",
        Side::Two => "player_two_lives",
    }
}

/// In-process store. Survives level reloads for as long as the process runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLivesStore {
    values: HashMap<String, i32>,
    saves: u32,
}

impl MemoryLivesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl LivesStore for MemoryLivesStore {
    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), LightDuelError> {
        self.saves += 1;
        Ok(())
    }
}

/// JSON-file store. Writes are buffered until `save`; a missing file reads
/// as an empty store.
#[derive(Debug)]
pub struct FileLivesStore {
    path: PathBuf,
    values: HashMap<String, i32>,
}

impl FileLivesStore {
    /// Open the store at `path`, loading any previously saved counters.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LightDuelError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), entries = values.len(), "Opened lives store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LivesStore for FileLivesStore {
    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), LightDuelError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basic_ops() {
        let mut store = MemoryLivesStore::new();
        assert!(!store.has_key("k"));
        assert_eq!(store.get_int("k"), None);

        store.set_int("k", 3);
        assert!(store.has_key("k"));
        assert_eq!(store.get_int("k"), Some(3));

        store.delete_key("k");
        assert!(!store.has_key("k"));
        store.save().unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn side_keys_differ() {
        assert_ne!(lives_key(Side::One), lives_key(Side::Two));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileLivesStore::open(dir.path().join("lives.json")).unwrap();
        assert!(!store.has_key(lives_key(Side::One)));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("lives.json");

        let mut store = FileLivesStore::open(&path).unwrap();
        store.set_int(lives_key(Side::One), 2);
        store.set_int(lives_key(Side::Two), 3);
        store.save().unwrap();

        let reopened = FileLivesStore::open(&path).unwrap();
        assert_eq!(reopened.get_int(lives_key(Side::One)), Some(2));
        assert_eq!(reopened.get_int(lives_key(Side::Two)), Some(3));
    }

    #[test]
    fn file_store_unsaved_writes_are_lost() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lives.json");

        let mut store = FileLivesStore::open(&path).unwrap();
        store.set_int(lives_key(Side::One), 1);
        drop(store);

        let reopened = FileLivesStore::open(&path).unwrap();
        assert!(!reopened.has_key(lives_key(Side::One)));
    }

    #[test]
    fn file_store_delete_then_save_clears() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lives.json");

        let mut store = FileLivesStore::open(&path).unwrap();
        store.set_int(lives_key(Side::One), 1);
        store.save().unwrap();
        store.delete_key(lives_key(Side::One));
        store.save().unwrap();

        let reopened = FileLivesStore::open(&path).unwrap();
        assert!(!reopened.has_key(lives_key(Side::One)));
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lives.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileLivesStore::open(&path),
            Err(LightDuelError::Serialization(_))
        ));
    }
}
