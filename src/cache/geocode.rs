//! File-backed place-to-coordinate memo.
//!
//! Port names repeat across itineraries, so a successful geocode lookup is
//! remembered forever: the store is append-only, never evicted. The file is
//! a small JSON document, read-modify-written per call with a temp-file
//! rename so a crashed writer cannot leave a torn document. Concurrent
//! writers are not locked against each other; the last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// A geocoded coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    version: u32,
    updated_at: String,
    entries: BTreeMap<String, LatLng>,
}

impl CacheFile {
    fn empty() -> Self {
        Self {
            version: 1,
            updated_at: Utc::now().to_rfc3339(),
            entries: BTreeMap::new(),
        }
    }
}

/// Append-only geocode cache persisted as a JSON document.
#[derive(Debug, Clone)]
pub struct GeocodeStore {
    path: PathBuf,
}

impl GeocodeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a place. A missing or unreadable cache file reads as empty.
    #[must_use]
    pub fn get(&self, place: &str) -> Option<LatLng> {
        let key = normalize_key(place)?;
        self.read().entries.get(&key).copied()
    }

    /// Record a successful lookup. Places that normalize to nothing are
    /// silently skipped.
    pub fn put(&self, place: &str, coords: LatLng) -> Result<()> {
        let Some(key) = normalize_key(place) else {
            return Ok(());
        };

        let mut cache = self.read();
        cache.entries.insert(key, coords);
        cache.updated_at = Utc::now().to_rfc3339();
        self.write(&cache)
    }

    /// Number of memoized places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> CacheFile {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return CacheFile::empty();
        };
        match serde_json::from_str::<CacheFile>(&raw) {
            Ok(cache) if cache.version == 1 => cache,
            _ => {
                debug!(path = %self.path.display(), "unusable geocode cache file, starting empty");
                CacheFile::empty()
            }
        }
    }

    fn write(&self, cache: &CacheFile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(cache)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Case-folded, whitespace-trimmed cache key; `None` for blank input.
fn normalize_key(place: &str) -> Option<String> {
    let key = place.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
