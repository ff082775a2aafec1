// ABOUTME: In-memory session store with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CachedReport, SessionId, SessionStore};
use crate::config::environment::SessionConfig;
use crate::constants::defaults;
use crate::errors::AppResult;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Session store tuning
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum number of live sessions; the least recently used is evicted beyond it
    pub max_entries: usize,
    /// Lifetime of a report after it was written
    pub ttl: Duration,
    /// Interval of the expiry sweep
    pub cleanup_interval: Duration,
    /// Run the expiry sweep in the background
    pub enable_background_cleanup: bool,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::SESSION_MAX_ENTRIES,
            ttl: Duration::from_secs(defaults::SESSION_TTL_SECS),
            cleanup_interval: Duration::from_secs(defaults::SESSION_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

impl From<&SessionConfig> for SessionStoreConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            ttl: config.ttl,
            ..Self::default()
        }
    }
}

/// Stored report with expiration
#[derive(Debug, Clone)]
struct SessionEntry {
    report: CachedReport,
    expires_at: Instant,
}

impl SessionEntry {
    fn new(report: CachedReport, ttl: Duration) -> Self {
        Self {
            report,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Store = Arc<RwLock<LruCache<SessionId, SessionEntry>>>;

/// In-memory session store with LRU eviction and background cleanup
///
/// The store is shared with the cleanup task, which removes expired sessions on its own
/// schedule. Reads also drop an expired entry on sight, so expiry never depends on the sweep.
#[derive(Clone)]
pub struct InMemorySessionStore {
    store: Store,
    ttl: Duration,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemorySessionStore {
    /// Capacity used when the configuration asks for zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a store, spawning the cleanup task when enabled and a runtime is available
    #[must_use]
    pub fn new(config: &SessionStoreConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let store: Store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = match tokio::runtime::Handle::try_current() {
            Ok(handle) if config.enable_background_cleanup => {
                let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
                let store_clone = store.clone();
                let cleanup_interval = config.cleanup_interval;

                handle.spawn(async move {
                    let mut interval = tokio::time::interval(cleanup_interval);
                    loop {
                        tokio::select! {
                            _ = interval.tick() => {
                                Self::cleanup_expired(&store_clone).await;
                            }
                            _ = shutdown_rx.recv() => {
                                tracing::debug!("Session cleanup task received shutdown signal");
                                break;
                            }
                        }
                    }
                });

                Some(Arc::new(shutdown_tx))
            }
            _ => None,
        };

        Self {
            store,
            ttl: config.ttl,
            shutdown_tx,
        }
    }

    /// Number of sessions currently held, expired ones included until swept
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether no session is held
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Remove all expired sessions
    async fn cleanup_expired(store: &Store) -> usize {
        let mut guard = store.write().await;

        let expired: Vec<SessionId> = guard
            .iter()
            .filter_map(|(k, v)| v.is_expired().then_some(*k))
            .collect();

        for key in &expired {
            guard.pop(key);
        }
        drop(guard);

        if !expired.is_empty() {
            tracing::debug!("Cleaned up {} expired sessions", expired.len());
        }
        expired.len()
    }

    /// Run one expiry sweep now, returning how many sessions were removed
    pub async fn purge_expired(&self) -> usize {
        Self::cleanup_expired(&self.store).await
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session: &SessionId) -> AppResult<Option<CachedReport>> {
        // LruCache::get updates access order, so this needs the write lock
        let mut store = self.store.write().await;

        let report = match store.peek(session).map(SessionEntry::is_expired) {
            Some(true) => {
                store.pop(session);
                None
            }
            Some(false) => store.get(session).map(|entry| entry.report.clone()),
            None => None,
        };
        drop(store);

        Ok(report)
    }

    async fn set(&self, session: &SessionId, report: CachedReport) -> AppResult<()> {
        let entry = SessionEntry::new(report, self.ttl);
        self.store.write().await.push(*session, entry);
        Ok(())
    }
}

impl Drop for InMemorySessionStore {
    fn drop(&mut self) {
        // Only the last clone holding the sender should stop the sweep
        if let Some(tx) = &self.shutdown_tx {
            if Arc::strong_count(tx) == 1 {
                if let Err(e) = tx.try_send(()) {
                    tracing::debug!(error = ?e, "Session store shutdown signal send failed");
                }
            }
        }
    }
}
