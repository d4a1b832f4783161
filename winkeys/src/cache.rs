//! Bounded, time-expiring cache of resolved control handles.
//!
//! Keys combine a stable window identity with the raw locator string. Expiry
//! is lazy: entries are validated at read time and removed on an expired
//! read, never proactively swept. The size cap evicts the single
//! oldest-inserted entry (FIFO, not LRU).

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::element::{ControlHandle, WindowHandle};

/// Maximum entry count before insertion-order eviction kicks in.
pub const DEFAULT_CAPACITY: usize = 100;

struct CacheEntry {
    control: ControlHandle,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    // Insertion order for FIFO eviction. Keys deleted elsewhere are also
    // removed here so the front is always a live entry.
    order: VecDeque<String>,
}

/// Cache of (window identity, locator) → previously resolved control handle.
///
/// Interior mutex because async dispatch tasks look controls up concurrently
/// with the sequential keyword flow.
pub struct ControlCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl ControlCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
        }
    }

    fn key(window: &WindowHandle, locator: &str) -> String {
        format!("{}::{locator}", window.identity())
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // A poisoned cache only means a panicking reader; the entries are
        // still coherent, so recover rather than propagate.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Look up a cached handle. An entry past its expiry instant is treated
    /// as a miss and removed.
    pub fn get(&self, window: &WindowHandle, locator: &str) -> Option<ControlHandle> {
        let key = Self::key(window, locator);
        let mut inner = self.lock();
        let expired = match inner.entries.get(&key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                trace!(%key, "cache hit");
                return Some(entry.control.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            trace!(%key, "cache entry expired");
            inner.entries.remove(&key);
            inner.order.retain(|k| k != &key);
        }
        None
    }

    /// Insert a handle valid strictly before `now + ttl`, evicting the
    /// oldest-inserted entry while over capacity.
    pub fn set(&self, window: &WindowHandle, locator: &str, control: ControlHandle, ttl: Duration) {
        let key = Self::key(window, locator);
        let mut inner = self.lock();
        let entry = CacheEntry {
            control,
            expires_at: Instant::now() + ttl,
        };
        // Overwriting keeps the key's original insertion position.
        if inner.entries.insert(key.clone(), entry).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    trace!(key = %oldest, "evicting oldest cache entry");
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Clear one window's entries, or everything when `window` is `None`.
    pub fn clear(&self, window: Option<&WindowHandle>) {
        let mut inner = self.lock();
        match window {
            Some(window) => {
                let prefix = format!("{}::", window.identity());
                inner.entries.retain(|key, _| !key.starts_with(&prefix));
                inner.order.retain(|key| !key.starts_with(&prefix));
            }
            None => {
                inner.entries.clear();
                inner.order.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ControlCache {
    fn default() -> Self {
        Self::new()
    }
}
