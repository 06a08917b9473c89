//! Snapshot store with lazy freshness checking
//!
//! The store owns the only shared mutable state in the system: the most
//! recently built snapshot, paired with an expiry instant. Readers get an
//! `Arc` to a complete snapshot; a rebuild scans without holding the read
//! lock and publishes its result as a single swap, so readers observe
//! either the old or the new snapshot, never a half-built one.
//!
//! Expiry is checked lazily on read; there is no background timer. At most
//! one rebuild runs at a time. A failed rebuild clears the store to an
//! empty snapshot rather than retaining stale data, so every subsequent
//! query visibly degrades to empty results until a scan succeeds again.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::scan::{ScanError, Scanner};
use super::types::Snapshot;

struct StoredSnapshot {
    snapshot: Arc<Snapshot>,
    expires_at: Instant,
}

/// Store holding the current index snapshot behind an expiry policy
pub struct IndexStore {
    scanner: Scanner,
    ttl: Duration,
    current: RwLock<Option<StoredSnapshot>>,
    rebuild_lock: Mutex<()>,
}

impl IndexStore {
    /// Create an empty store; no scan happens until the first read or rebuild
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            scanner: Scanner::new(settings),
            ttl: settings.cache_ttl(),
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Run a full rescan and atomically replace the stored snapshot
    ///
    /// Idempotent and safe to invoke repeatedly; always a full rescan,
    /// never delta work.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the scan failed wholesale. The store is
    /// then cleared to an empty snapshot.
    pub fn rebuild(&self) -> Result<(), ScanError> {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.rebuild_locked()
    }

    /// Get the current snapshot, rebuilding synchronously if absent or expired
    ///
    /// The freshness check is lazy: an expired snapshot is only noticed,
    /// and replaced, when a reader asks for it. When the lazy rebuild
    /// fails, the empty snapshot it installed is returned; queries degrade
    /// to empty results instead of surfacing an error here.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.fresh() {
            return snapshot;
        }

        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another reader may have rebuilt while we waited for the lock
        if let Some(snapshot) = self.fresh() {
            return snapshot;
        }
        if let Err(error) = self.rebuild_locked() {
            tracing::error!(%error, "lazy rebuild failed, serving empty index");
        }

        self.stored()
    }

    /// Must be called with `rebuild_lock` held
    fn rebuild_locked(&self) -> Result<(), ScanError> {
        match self.scanner.scan() {
            Ok(snapshot) => {
                tracing::info!(
                    images = snapshot.images.len(),
                    folders = snapshot.folders.len(),
                    "index rebuilt"
                );
                self.install(snapshot);
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "scan failed, clearing index");
                self.install(Snapshot::empty());
                Err(error)
            }
        }
    }

    fn install(&self, snapshot: Snapshot) {
        let stored = StoredSnapshot {
            snapshot: Arc::new(snapshot),
            expires_at: Instant::now() + self.ttl,
        };
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Some(stored);
    }

    /// The stored snapshot if it exists and has not expired
    fn fresh(&self) -> Option<Arc<Snapshot>> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        current
            .as_ref()
            .filter(|stored| stored.expires_at > Instant::now())
            .map(|stored| Arc::clone(&stored.snapshot))
    }

    /// The stored snapshot regardless of freshness, empty if none exists
    fn stored(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        current
            .as_ref()
            .map_or_else(|| Arc::new(Snapshot::empty()), |stored| Arc::clone(&stored.snapshot))
    }
}
