//! Named response caches.
//!
//! A storage holds any number of caches, each mapping a request URL to a
//! stored response. Lookups search every cache in order.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{OfflineError, Response, ResponseType};

pub trait CacheStorage: Send + Sync {
    /// Cache names in lookup order.
    fn keys(&self) -> Result<Vec<String>, OfflineError>;

    /// Create the cache if it does not exist yet.
    fn open(&self, cache: &str) -> Result<(), OfflineError>;

    /// Remove a cache and everything in it. Returns false if it did not exist.
    fn delete(&self, cache: &str) -> Result<bool, OfflineError>;

    /// Store `response` for `url`, creating the cache if needed.
    fn put(&self, cache: &str, url: &str, response: &Response) -> Result<(), OfflineError>;

    /// First stored response for `url` across all caches.
    fn lookup(&self, url: &str) -> Result<Option<Response>, OfflineError>;
}

/// In-process storage. Caches keep their creation order.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<Vec<(String, HashMap<String, Response>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in one cache, or `None` if it does not exist.
    pub fn entry_count(&self, cache: &str) -> Option<usize> {
        self.caches
            .lock()
            .iter()
            .find(|(name, _)| name == cache)
            .map(|(_, entries)| entries.len())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        Ok(self.caches.lock().iter().map(|(name, _)| name.clone()).collect())
    }

    fn open(&self, cache: &str) -> Result<(), OfflineError> {
        let mut caches = self.caches.lock();
        if !caches.iter().any(|(name, _)| name == cache) {
            caches.push((cache.to_string(), HashMap::new()));
        }
        Ok(())
    }

    fn delete(&self, cache: &str) -> Result<bool, OfflineError> {
        let mut caches = self.caches.lock();
        let before = caches.len();
        caches.retain(|(name, _)| name != cache);
        Ok(caches.len() != before)
    }

    fn put(&self, cache: &str, url: &str, response: &Response) -> Result<(), OfflineError> {
        let mut caches = self.caches.lock();
        match caches.iter_mut().find(|(name, _)| name == cache) {
            Some((_, entries)) => {
                entries.insert(url.to_string(), response.clone());
            }
            None => {
                let entries = HashMap::from([(url.to_string(), response.clone())]);
                caches.push((cache.to_string(), entries));
            }
        }
        Ok(())
    }

    fn lookup(&self, url: &str) -> Result<Option<Response>, OfflineError> {
        Ok(self
            .caches
            .lock()
            .iter()
            .find_map(|(_, entries)| entries.get(url).cloned()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    url: String,
    status: u16,
    response_type: ResponseType,
    content_type: Option<String>,
    /// Standard base64
    body: String,
}

/// Storage on disk: one directory per cache, one JSON file per entry named by
/// the SHA-256 of its URL. Caches are listed in name order.
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    pub fn open_root(root: impl Into<PathBuf>) -> Result<Self, OfflineError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!("Offline cache root: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_cache_name(cache: &str) -> bool {
        !cache.is_empty()
            && !cache.starts_with('.')
            && cache
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    fn cache_dir(&self, cache: &str) -> Result<PathBuf, OfflineError> {
        if !Self::is_cache_name(cache) {
            return Err(OfflineError::InvalidCacheName(cache.to_string()));
        }
        Ok(self.root.join(cache))
    }

    fn entry_path(dir: &Path, url: &str) -> PathBuf {
        dir.join(format!("{}.json", hex::encode(Sha256::digest(url.as_bytes()))))
    }

    fn read_entry(path: &Path) -> Result<Option<Response>, OfflineError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: StoredEntry = serde_json::from_str(&raw)?;
        let body = base64::engine::general_purpose::STANDARD.decode(entry.body)?;
        Ok(Some(Response {
            status: entry.status,
            response_type: entry.response_type,
            content_type: entry.content_type,
            body,
        }))
    }
}

impl CacheStorage for DiskCacheStorage {
    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                // Directories we could never have created are not caches.
                match entry.file_name().to_str() {
                    Some(name) if Self::is_cache_name(name) => names.push(name.to_string()),
                    _ => tracing::debug!("Skipping stray directory {:?}", entry.file_name()),
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, cache: &str) -> Result<(), OfflineError> {
        fs::create_dir_all(self.cache_dir(cache)?)?;
        Ok(())
    }

    fn delete(&self, cache: &str) -> Result<bool, OfflineError> {
        match fs::remove_dir_all(self.cache_dir(cache)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, cache: &str, url: &str, response: &Response) -> Result<(), OfflineError> {
        let dir = self.cache_dir(cache)?;
        fs::create_dir_all(&dir)?;

        let entry = StoredEntry {
            url: url.to_string(),
            status: response.status,
            response_type: response.response_type,
            content_type: response.content_type.clone(),
            body: base64::engine::general_purpose::STANDARD.encode(&response.body),
        };
        fs::write(Self::entry_path(&dir, url), serde_json::to_vec(&entry)?)?;
        Ok(())
    }

    fn lookup(&self, url: &str) -> Result<Option<Response>, OfflineError> {
        for cache in self.keys()? {
            let path = Self::entry_path(&self.cache_dir(&cache)?, url);
            if let Some(response) = Self::read_entry(&path)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Response {
        Response::new(200, ResponseType::Basic, body).with_content_type("text/html")
    }

    #[test]
    fn test_memory_lookup_searches_every_cache() {
        let storage = MemoryCacheStorage::new();
        storage.open("shorequad-v0").unwrap();
        storage
            .put("shorequad-v1", "http://localhost:8080/", &page("new"))
            .unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["shorequad-v0", "shorequad-v1"]);
        let hit = storage.lookup("http://localhost:8080/").unwrap().unwrap();
        assert_eq!(hit.body, b"new");
        assert!(storage.lookup("http://localhost:8080/x").unwrap().is_none());
    }

    #[test]
    fn test_memory_delete() {
        let storage = MemoryCacheStorage::new();
        storage.open("a").unwrap();
        assert!(storage.delete("a").unwrap());
        assert!(!storage.delete("a").unwrap());
        assert_eq!(storage.entry_count("a"), None);
    }

    #[test]
    fn test_disk_put_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::open_root(dir.path()).unwrap();
        let url = "http://localhost:8080/css/styles.css";
        let response = Response::new(200, ResponseType::Basic, vec![0u8, 159, 146, 150])
            .with_content_type("text/css");

        storage.put("shorequad-v1", url, &response).unwrap();

        assert_eq!(storage.lookup(url).unwrap(), Some(response));
        assert_eq!(storage.keys().unwrap(), vec!["shorequad-v1"]);
    }

    #[test]
    fn test_disk_delete_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::open_root(dir.path()).unwrap();
        storage.put("shorequad-v0", "http://localhost:8080/", &page("old")).unwrap();

        assert!(storage.delete("shorequad-v0").unwrap());
        assert!(!storage.delete("shorequad-v0").unwrap());
        assert!(storage.lookup("http://localhost:8080/").unwrap().is_none());
    }

    #[test]
    fn test_disk_rejects_unsafe_cache_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::open_root(dir.path()).unwrap();

        for name in ["", "..", "../escape", "a/b"] {
            assert!(matches!(
                storage.open(name),
                Err(OfflineError::InvalidCacheName(_))
            ));
        }
    }

    #[test]
    fn test_disk_keys_skip_stray_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::open_root(dir.path()).unwrap();
        storage.open("shorequad-v1").unwrap();
        std::fs::create_dir(dir.path().join(".tmp")).unwrap();
        std::fs::create_dir(dir.path().join("a b")).unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["shorequad-v1"]);
    }
}
