//! Versioned config store shared between the engine and the reload handler.
//!
//! `ConfigStore<T>` wraps `Arc<RwLock<T>>`; readers take a short read lock
//! per command, the SIGHUP handler swaps the whole value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard};

/// A shared, versioned configuration value.
pub struct ConfigStore<T> {
    inner: Arc<ConfigStoreInner<T>>,
}

struct ConfigStoreInner<T> {
    data: RwLock<T>,
    version: AtomicU64,
}

impl<T> ConfigStore<T> {
    /// Create a new `ConfigStore` with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(ConfigStoreInner {
                data: RwLock::new(initial),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the stored value. Returns the new version number.
    pub async fn update(&self, value: T) -> u64 {
        let mut guard = self.inner.data.write().await;
        *guard = value;
        self.inner.version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Read the current value.
    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
