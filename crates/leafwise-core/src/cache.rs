//! On-disk cache of model responses.
//!
//! Identifying the same photo twice should not cost three more model calls.
//! Entries are keyed by a BLAKE3 hash over everything that determines the
//! answer: provider, model, flow name, rendered prompt and attached image.
//! Values are the raw model text of answers the caller accepted; schema
//! parsing still runs on a hit.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::llm::LlmRequest;

const TEMP_PREFIX: &str = ".entry-";
const TEMP_SUFFIX: &str = ".json.tmp";

/// A cached model answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub flow: String,
    pub model: String,
    pub text: String,
}

/// Directory-backed response cache.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the cache key for one flow call.
    pub fn key(provider: &str, model: &str, flow: &str, request: &LlmRequest) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [provider, model, flow, request.prompt.as_str()] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
        if let Some(image) = &request.image {
            hasher.update(image.media_type.as_bytes());
            hasher.update(&[0]);
            hasher.update(image.data.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let shard = key.get(..2).unwrap_or("00");
        self.dir.join(shard).join(format!("{key}.json"))
    }

    /// Look up an entry. Missing or unreadable entries are misses.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Ignoring corrupt cache entry {:?}: {e}", path);
                None
            }
        }
    }

    /// Store an entry, replacing any previous one atomically.
    ///
    /// Each write goes through its own temp file, so concurrent writers of
    /// the same key never collide; the last rename wins.
    pub async fn put(&self, key: &str, entry: &CacheEntry) -> io::Result<()> {
        let path = self.entry_path(key);
        let json = serde_json::to_vec(entry).map_err(io::Error::other)?;
        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(io::Error::other)?
    }

    /// Remove every cached entry. Returns the number of entries removed.
    ///
    /// Only `<shard>/<key>.json` files (and leftover temp files) are touched.
    /// Shard directories are removed once empty; the cache root never is.
    pub fn clear(&self) -> io::Result<usize> {
        if !self.dir.is_dir() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut shards = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let name = entry.file_name().to_string_lossy();
            if entry.depth() == 1 {
                if entry.file_type().is_dir() && is_shard_name(&name) {
                    shards.push(entry.path().to_path_buf());
                }
                continue;
            }

            let Some(shard) = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            else {
                continue;
            };
            if !entry.file_type().is_file() || !is_shard_name(shard) {
                continue;
            }
            if is_entry_name(&name, shard) {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            } else if is_temp_name(&name) {
                std::fs::remove_file(entry.path())?;
            }
        }

        for shard in shards {
            // Fails, and is skipped, when foreign files remain
            let _ = std::fs::remove_dir(&shard);
        }
        Ok(removed)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other(format!("no parent directory for {}", path.display())))?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn is_shard_name(name: &str) -> bool {
    name.len() == 2 && is_lower_hex(name)
}

fn is_entry_name(name: &str, shard: &str) -> bool {
    name.strip_suffix(".json")
        .is_some_and(|key| key.len() == 64 && is_lower_hex(key) && key.starts_with(shard))
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageInput;

    fn entry(text: &str) -> CacheEntry {
        CacheEntry {
            flow: "generatePlantDescription".to_string(),
            model: "mock-v1".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_key_depends_on_every_part() {
        let request = LlmRequest::new("Describe Monstera");
        let base = ResponseCache::key("anthropic", "m", "flow", &request);

        assert_eq!(base, ResponseCache::key("anthropic", "m", "flow", &request));
        assert_ne!(base, ResponseCache::key("openai", "m", "flow", &request));
        assert_ne!(base, ResponseCache::key("anthropic", "m2", "flow", &request));
        assert_ne!(
            base,
            ResponseCache::key("anthropic", "m", "flow", &LlmRequest::new("Describe Fern"))
        );

        let with_image = request
            .clone()
            .with_image(ImageInput::from_bytes(&[1, 2, 3], "png"));
        assert_ne!(base, ResponseCache::key("anthropic", "m", "flow", &with_image));
    }

    #[test]
    fn test_key_separators_prevent_collisions() {
        let request = LlmRequest::new("x");
        assert_ne!(
            ResponseCache::key("ab", "c", "flow", &request),
            ResponseCache::key("a", "bc", "flow", &request)
        );
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = ResponseCache::key("p", "m", "f", &LlmRequest::new("prompt"));

        assert!(cache.get(&key).await.is_none());
        cache.put(&key, &entry("A climbing aroid.")).await.unwrap();
        let hit = cache.get(&key).await.unwrap();
        assert_eq!(hit.text, "A climbing aroid.");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = ResponseCache::key("p", "m", "f", &LlmRequest::new("prompt"));
        let path = cache.entry_path(&key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache"));
        assert_eq!(cache.clear().unwrap(), 0);

        for prompt in ["a", "b", "c"] {
            let key = ResponseCache::key("p", "m", "f", &LlmRequest::new(prompt));
            cache.put(&key, &entry(prompt)).await.unwrap();
        }
        assert_eq!(cache.clear().unwrap(), 3);
        assert!(cache.dir().is_dir());
        assert_eq!(std::fs::read_dir(cache.dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_clear_leaves_foreign_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = ResponseCache::key("p", "m", "f", &LlmRequest::new("prompt"));
        cache.put(&key, &entry("cached")).await.unwrap();

        let notes = dir.path().join("my_notes.txt");
        std::fs::write(&notes, "keep me").unwrap();
        let photos = dir.path().join("photos");
        std::fs::create_dir(&photos).unwrap();
        std::fs::write(photos.join("fern.json"), "{}").unwrap();
        // Lives in a shard directory but is not a cache entry
        let stray = cache.entry_path(&key).with_file_name("readme.json");
        std::fs::write(&stray, "{}").unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.get(&key).await.is_none());
        assert_eq!(std::fs::read_to_string(&notes).unwrap(), "keep me");
        assert!(photos.join("fern.json").exists());
        assert!(stray.exists());
        assert!(dir.path().is_dir());
    }

    #[tokio::test]
    async fn test_clear_removes_leftover_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = ResponseCache::key("p", "m", "f", &LlmRequest::new("prompt"));
        let shard = cache.entry_path(&key).parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&shard).unwrap();
        std::fs::write(shard.join(".entry-abc123.json.tmp"), "{").unwrap();

        assert_eq!(cache.clear().unwrap(), 0);
        assert!(!shard.exists());
    }

    #[tokio::test]
    async fn test_concurrent_puts_of_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let key = ResponseCache::key("p", "m", "f", &LlmRequest::new("same photo"));

        let writes = (0..8).map(|i| {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move { cache.put(&key, &entry(&format!("answer {i}"))).await })
        });
        for write in writes.collect::<Vec<_>>() {
            write.await.unwrap().unwrap();
        }

        let hit = cache.get(&key).await.unwrap();
        assert!(hit.text.starts_with("answer "));
        let shard = cache.entry_path(&key).parent().unwrap().to_path_buf();
        assert_eq!(std::fs::read_dir(shard).unwrap().count(), 1);
    }
}
