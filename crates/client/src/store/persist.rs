//! Durable local storage for device-scoped state.
//!
//! The cart snapshot and the guest recently-viewed list live under
//! well-known keys in a [`StorageBackend`]. Writes are best-effort and
//! fire-and-forget: a failed write is logged at `warn` and never
//! surfaced to the caller, matching the durability contract of the
//! stores (not guaranteed-durable before return).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use quickcart_core::ProductId;

/// Storage key for the serialized cart snapshot.
pub const CART_KEY: &str = "cart-items";

/// Storage key for the guest recently-viewed product list.
pub const RECENTLY_VIEWED_KEY: &str = "recently-viewed";

/// Maximum entries kept in the recently-viewed list.
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Key-value storage for durable device-local state.
///
/// Implementations must be safe to share across the session; writes are
/// best-effort (failures logged, not returned).
pub trait StorageBackend: Send + Sync {
    /// Read the value under a key, if present.
    fn load(&self, key: &str) -> Option<String>;

    /// Write a value under a key (best-effort).
    fn save(&self, key: &str, value: &str);

    /// Delete a key (best-effort; absent keys are a no-op).
    fn remove(&self, key: &str);
}

// =============================================================================
// Backends
// =============================================================================

/// File-per-key storage under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`, creating it if needed.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to create storage directory");
        }
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            tracing::warn!(key, error = %e, "Failed to persist local state");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path_for(key))
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(key, error = %e, "Failed to remove local state");
        }
    }
}

/// In-memory storage for tests and persistence-less sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

// =============================================================================
// Recently Viewed
// =============================================================================

/// Guest recently-viewed product list: capped, most-recent-first,
/// de-duplicated.
#[derive(Clone)]
pub struct RecentlyViewed {
    storage: Arc<dyn StorageBackend>,
}

impl RecentlyViewed {
    /// Create a recently-viewed list over a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Record a product view, moving it to the front of the list.
    pub fn record(&self, product_id: &ProductId) {
        let mut ids = self.list();
        ids.retain(|id| id != product_id);
        ids.insert(0, product_id.clone());
        ids.truncate(MAX_RECENTLY_VIEWED);
        match serde_json::to_string(&ids) {
            Ok(json) => self.storage.save(RECENTLY_VIEWED_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize recently-viewed list"),
        }
    }

    /// The recently-viewed product ids, most recent first.
    ///
    /// A corrupt persisted list is discarded and wiped, returning empty.
    #[must_use]
    pub fn list(&self) -> Vec<ProductId> {
        let Some(raw) = self.storage.load(RECENTLY_VIEWED_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt recently-viewed list");
                self.storage.remove(RECENTLY_VIEWED_KEY);
                Vec::new()
            }
        }
    }

    /// Forget all recorded views.
    pub fn clear(&self) {
        self.storage.remove(RECENTLY_VIEWED_KEY);
    }
}
