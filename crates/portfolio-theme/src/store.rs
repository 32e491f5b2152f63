//! Durable storage for the user's explicit theme choice.
//!
//! The controller talks to storage through [`PreferenceSlot`], which binds a
//! [`PreferenceStore`] to one fixed key and swallows every failure. Storage
//! that is disabled, full or corrupt degrades to an in-memory session; it
//! never blocks a mode change.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;
use crate::mode::ThemeMode;

/// Key under which the theme choice is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-theme";

/// A synchronous key-value store scoped to one origin or user profile.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Reads an entry directly, bypassing the `Result` of the trait.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file, e.g. `{"portfolio-theme": "dark"}`.
///
/// A missing file reads as empty. Writes preserve unrelated keys and create
/// parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// A store that is never available (disabled or sandboxed storage).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// A store bound to the fixed theme key, with failures swallowed.
pub struct PreferenceSlot {
    store: Box<dyn PreferenceStore>,
    key: String,
    /// Explicit choice held in memory after a failed write.
    session_choice: Cell<Option<ThemeMode>>,
    /// Set after a failed read; cleared by the next successful write.
    unreadable: Cell<bool>,
}

impl PreferenceSlot {
    pub fn new(store: Box<dyn PreferenceStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            session_choice: Cell::new(None),
            unreadable: Cell::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored mode, if a valid one is stored.
    ///
    /// Unreadable storage and values other than `light`/`dark` read as absent.
    /// Once a read has failed the store is not consulted again until a write
    /// succeeds.
    pub fn load(&self) -> Option<ThemeMode> {
        if self.unreadable.get() {
            return None;
        }
        match self.store.get(&self.key) {
            Ok(Some(raw)) => match raw.parse::<ThemeMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    tracing::debug!(key = %self.key, value = %raw, "ignoring invalid stored theme");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "theme preference unreadable");
                self.unreadable.set(true);
                None
            }
        }
    }

    /// Persists an explicit choice. Never fails.
    pub fn save(&self, mode: ThemeMode) {
        match self.store.set(&self.key, mode.as_str()) {
            Ok(()) => {
                self.session_choice.set(None);
                self.unreadable.set(false);
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "theme preference not persisted, keeping it for this session"
                );
                self.session_choice.set(Some(mode));
            }
        }
    }

    /// Whether the user has made an explicit choice.
    pub fn is_present(&self) -> bool {
        self.session_choice.get().is_some() || self.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(view.peek("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_unavailable_store_fails() {
        assert!(matches!(UnavailableStore.get("k"), Err(StoreError::Unavailable)));
        assert!(matches!(UnavailableStore.set("k", "v"), Err(StoreError::Unavailable)));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"other": "kept"}"#).unwrap();

        let store = FileStore::new(&path);
        store.set(DEFAULT_STORAGE_KEY, "dark").unwrap();

        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("prefs.json");
        FileStore::new(&path).set("k", "light").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStore::new(&path).get("k"),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_slot_load_valid_and_invalid() {
        let slot = PreferenceSlot::new(
            Box::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "dark")),
            DEFAULT_STORAGE_KEY,
        );
        assert_eq!(slot.load(), Some(ThemeMode::Dark));

        let slot = PreferenceSlot::new(
            Box::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "sepia")),
            DEFAULT_STORAGE_KEY,
        );
        assert_eq!(slot.load(), None);
        assert!(!slot.is_present());
    }

    #[test]
    fn test_slot_save_writes_mode() {
        let store = MemoryStore::new();
        let slot = PreferenceSlot::new(Box::new(store.clone()), "custom-key");
        slot.save(ThemeMode::Light);
        assert_eq!(store.peek("custom-key").as_deref(), Some("light"));
        assert!(slot.is_present());
    }

    #[test]
    fn test_slot_unavailable_keeps_session_choice() {
        let slot = PreferenceSlot::new(Box::new(UnavailableStore), DEFAULT_STORAGE_KEY);
        assert_eq!(slot.load(), None);
        assert!(!slot.is_present());

        slot.save(ThemeMode::Dark);
        assert!(slot.is_present());
    }

    struct FlakyStore {
        reads: Rc<Cell<u32>>,
        broken: Rc<Cell<bool>>,
        inner: MemoryStore,
    }

    impl PreferenceStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            if self.broken.get() {
                return Err(StoreError::Unavailable);
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.broken.get() {
                return Err(StoreError::Unavailable);
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_slot_stops_reading_after_failure_until_write_succeeds() {
        let reads = Rc::new(Cell::new(0));
        let broken = Rc::new(Cell::new(true));
        let slot = PreferenceSlot::new(
            Box::new(FlakyStore {
                reads: Rc::clone(&reads),
                broken: Rc::clone(&broken),
                inner: MemoryStore::new(),
            }),
            DEFAULT_STORAGE_KEY,
        );

        assert_eq!(slot.load(), None);
        for _ in 0..5 {
            assert!(!slot.is_present());
        }
        assert_eq!(reads.get(), 1);

        broken.set(false);
        slot.save(ThemeMode::Dark);
        assert_eq!(slot.load(), Some(ThemeMode::Dark));
        assert_eq!(reads.get(), 2);
    }
}
