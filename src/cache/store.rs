//! Exact-prompt response cache persisted as one JSON file.
//!
//! The whole file is read before every lookup and before every update, and
//! rewritten in full after every update. There is no expiry, eviction or
//! locking: two processes writing at once can lose each other's entries,
//! and the last full write wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::CacheError;
use crate::logging::CallLog;

/// Prompt text to response text.
pub type CacheMap = BTreeMap<String, String>;

/// Handle to the cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    log: Arc<CallLog>,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>, log: Arc<CallLog>) -> Self {
        Self {
            path: path.into(),
            log,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache file. A missing file is an empty cache.
    pub fn try_load(&self) -> Result<CacheMap, CacheError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the cache file, treating any failure as an empty cache.
    pub fn load(&self) -> CacheMap {
        self.try_load().unwrap_or_else(|e| {
            self.log.warn(&format!(
                "Failed to load cache file '{}': {}. Starting with empty cache.",
                self.path.display(),
                e
            ));
            CacheMap::new()
        })
    }

    /// Second read taken right before an update, so entries written by
    /// another process since the lookup are kept.
    pub fn reload_for_update(&self) -> CacheMap {
        self.try_load().unwrap_or_else(|e| {
            self.log.warn(&format!(
                "Failed to reload cache before saving: {}. Overwriting might occur.",
                e
            ));
            CacheMap::new()
        })
    }

    /// Exact match only.
    pub fn lookup<'a>(cache: &'a CacheMap, prompt: &str) -> Option<&'a String> {
        cache.get(prompt)
    }

    /// Serialize `cache` over the file with 4-space indentation.
    pub fn try_save(&self, cache: &CacheMap) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        cache.serialize(&mut ser)?;
        std::fs::write(&self.path, buf)?;
        Ok(())
    }

    /// Write `cache`, logging failures instead of returning them.
    pub fn save(&self, cache: &CacheMap) {
        if let Err(e) = self.try_save(cache) {
            self.log.error(&format!(
                "Failed to save cache to '{}': {}",
                self.path.display(),
                e
            ));
        }
    }

    /// Reload, set `prompt` to `response`, and save.
    pub fn insert(&self, prompt: &str, response: &str) {
        let mut cache = self.reload_for_update();
        cache.insert(prompt.to_string(), response.to_string());
        self.save(&cache);
    }

    /// Delete the cache file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        store: CacheStore,
        log: Arc<CallLog>,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let log = Arc::new(CallLog::open(&tmp.path().join("logs")).unwrap());
        let store = CacheStore::new(tmp.path().join("llm_cache.json"), log.clone());
        Fixture {
            _tmp: tmp,
            store,
            log,
        }
    }

    fn log_text(log: &CallLog) -> String {
        std::fs::read_to_string(log.path().unwrap()).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_without_warning() {
        let f = fixture();
        assert!(f.store.load().is_empty());
        assert!(!log_text(&f.log).contains("WARN"));
    }

    #[test]
    fn test_save_then_load() {
        let f = fixture();
        let mut cache = CacheMap::new();
        cache.insert("What is 2+2?".into(), "4".into());
        f.store.save(&cache);
        assert_eq!(f.store.load(), cache);
    }

    #[test]
    fn test_saved_file_is_indented_json_object() {
        let f = fixture();
        f.store.insert("p", "r");
        let text = std::fs::read_to_string(f.store.path()).unwrap();
        assert_eq!(text, "{\n    \"p\": \"r\"\n}");
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_warns() {
        let f = fixture();
        std::fs::write(f.store.path(), "{ not json").unwrap();
        assert!(f.store.load().is_empty());
        let log = log_text(&f.log);
        assert!(log.contains("WARN"));
        assert!(log.contains("Starting with empty cache."));
    }

    #[test]
    fn test_non_string_values_are_corrupt() {
        let f = fixture();
        std::fs::write(f.store.path(), r#"{"p": 42}"#).unwrap();
        assert!(matches!(f.store.try_load(), Err(CacheError::Json(_))));
        assert!(f.store.load().is_empty());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let mut cache = CacheMap::new();
        cache.insert("Hello".into(), "hi".into());
        assert_eq!(CacheStore::lookup(&cache, "Hello").map(String::as_str), Some("hi"));
        assert!(CacheStore::lookup(&cache, "hello").is_none());
        assert!(CacheStore::lookup(&cache, "Hello ").is_none());
    }

    #[test]
    fn test_insert_keeps_entries_written_by_others() {
        let f = fixture();
        let other = CacheStore::new(f.store.path(), f.log.clone());
        other.insert("from-other", "x");
        f.store.insert("mine", "y");
        let cache = f.store.load();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache["from-other"], "x");
        assert_eq!(cache["mine"], "y");
    }

    #[test]
    fn test_insert_last_write_wins() {
        let f = fixture();
        f.store.insert("p", "old");
        f.store.insert("p", "new");
        assert_eq!(f.store.load()["p"], "new");
    }

    #[test]
    fn test_insert_over_corrupt_file_warns_and_overwrites() {
        let f = fixture();
        std::fs::write(f.store.path(), "garbage").unwrap();
        f.store.insert("p", "r");
        assert!(log_text(&f.log).contains("Overwriting might occur."));
        assert_eq!(f.store.load()["p"], "r");
    }

    #[test]
    fn test_save_failure_is_logged_not_raised() {
        let f = fixture();
        // A regular file where the parent directory should be makes the
        // write fail regardless of the user's permissions.
        let blocker = f.store.path().with_file_name("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = CacheStore::new(blocker.join("llm_cache.json"), f.log.clone());

        let mut cache = CacheMap::new();
        cache.insert("p".into(), "r".into());
        assert!(store.try_save(&cache).is_err());
        store.save(&cache);

        let log = log_text(&f.log);
        assert!(log.contains("ERROR"));
        assert!(log.contains("Failed to save cache to"));
    }

    #[test]
    fn test_clear_removes_file_and_tolerates_missing() {
        let f = fixture();
        f.store.insert("p", "r");
        assert!(f.store.path().exists());
        f.store.clear().unwrap();
        assert!(!f.store.path().exists());
        f.store.clear().unwrap();
    }

    #[test]
    fn test_unicode_prompts_survive() {
        let f = fixture();
        f.store.insert("¿Qué es un pato? 🦆", "Un ave.");
        assert_eq!(f.store.load()["¿Qué es un pato? 🦆"], "Un ave.");
    }
}
