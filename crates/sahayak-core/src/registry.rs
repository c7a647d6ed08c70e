// Session registry
//
// Owns the mapping from (user, session) keys to runtime handles. Creation is
// lazy and idempotent per key: the first call registers the session with the
// runtime and stores the handle, later calls return the same handle instance.
// A handle is never replaced or invalidated while it stays in the map.
//
// Two departures from a bare map-in-a-lock:
// - creation is single-flight per key, so concurrent first requests cannot
//   register the same session with the runtime twice
// - the map is bounded; the least recently used entry is evicted at capacity

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::event::Artifact;
use crate::runtime::{AgentEventStream, AgentRuntime};
use crate::turn::Turn;

/// Identifies one conversational thread with the agent runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// A runtime handle bound to one session key.
/// All turns issued through a handle land on the same runtime conversation,
/// preserving the runtime's incremental state for that thread.
pub struct SessionHandle {
    key: SessionKey,
    runtime: Arc<dyn AgentRuntime>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("key", &self.key).finish()
    }
}

impl SessionHandle {
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Send one turn on this session's conversation thread
    pub async fn run(&self, turn: Turn) -> Result<AgentEventStream> {
        self.runtime
            .run(&self.key.user_id, &self.key.session_id, turn)
            .await
    }

    /// List artifacts recorded for this session
    pub async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        self.runtime
            .list_artifacts(&self.key.user_id, &self.key.session_id)
            .await
    }
}

struct Entry {
    handle: Arc<SessionHandle>,
    last_used: AtomicU64,
}

/// Bounded registry of per-session runtime handles
pub struct SessionRegistry {
    runtime: Arc<dyn AgentRuntime>,
    app_name: String,
    capacity: usize,
    entries: RwLock<HashMap<SessionKey, Entry>>,
    init_locks: Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>,
    clock: AtomicU64,
}

impl SessionRegistry {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        app_name: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            runtime,
            app_name: app_name.into(),
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
            init_locks: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
        }
    }

    /// Return the handle for a key, creating and registering it on first use.
    /// Repeated calls with the same key return the identical handle instance.
    /// Runtime registration failure propagates and is not cached.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<SessionHandle>> {
        let key = SessionKey::new(user_id, session_id);

        if let Some(handle) = self.lookup(&key).await {
            return Ok(handle);
        }

        // Single-flight: only one task runs create_session for a given key.
        let init_lock = {
            let mut locks = self.init_locks.lock().await;
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        let _guard = init_lock.lock().await;

        // Another task may have finished creation while we waited.
        if let Some(handle) = self.lookup(&key).await {
            return Ok(handle);
        }

        self.runtime
            .create_session(&self.app_name, user_id, session_id)
            .await?;

        let handle = Arc::new(SessionHandle {
            key: key.clone(),
            runtime: Arc::clone(&self.runtime),
        });
        {
            let mut entries = self.entries.write().await;
            if entries.len() >= self.capacity {
                Self::evict_lru(&mut entries);
            }
            entries.insert(
                key.clone(),
                Entry {
                    handle: Arc::clone(&handle),
                    last_used: AtomicU64::new(self.tick()),
                },
            );
        }
        self.init_locks.lock().await.remove(&key);

        tracing::info!(user_id, session_id, "created agent session");
        Ok(handle)
    }

    /// Whether a handle currently exists for the key
    pub async fn contains(&self, user_id: &str, session_id: &str) -> bool {
        let key = SessionKey::new(user_id, session_id);
        self.entries.read().await.contains_key(&key)
    }

    /// Number of live session handles
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn lookup(&self, key: &SessionKey) -> Option<Arc<SessionHandle>> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        entry.last_used.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.handle))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn evict_lru(entries: &mut HashMap<SessionKey, Entry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            tracing::debug!(
                user_id = %key.user_id,
                session_id = %key.session_id,
                "evicting least recently used session"
            );
            entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockAgentRuntime;
    use std::time::Duration;

    fn registry(runtime: Arc<MockAgentRuntime>, capacity: usize) -> SessionRegistry {
        SessionRegistry::new(runtime, "sahayak", capacity)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_handle() {
        let runtime = Arc::new(MockAgentRuntime::new());
        let registry = registry(Arc::clone(&runtime), 16);

        let first = registry.get_or_create("teacher-1", "s-1").await.unwrap();
        let second = registry.get_or_create("teacher-1", "s-1").await.unwrap();
        let third = registry.get_or_create("teacher-1", "s-1").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(runtime.created_sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_handles() {
        let runtime = Arc::new(MockAgentRuntime::new());
        let registry = registry(Arc::clone(&runtime), 16);

        let a = registry.get_or_create("teacher-1", "s-1").await.unwrap();
        let b = registry.get_or_create("teacher-1", "s-2").await.unwrap();
        let c = registry.get_or_create("teacher-2", "s-1").await.unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn test_concurrent_creation_is_single_flight() {
        let runtime = Arc::new(
            MockAgentRuntime::new().with_create_delay(Duration::from_millis(20)),
        );
        let registry = Arc::new(registry(Arc::clone(&runtime), 16));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.get_or_create("teacher-1", "s-1").await })
            })
            .collect();

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap().unwrap());
        }

        // Every task observed the same handle; the runtime saw one registration.
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
        assert_eq!(runtime.created_sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_lru_eviction_at_capacity() {
        let runtime = Arc::new(MockAgentRuntime::new());
        let registry = registry(Arc::clone(&runtime), 2);

        registry.get_or_create("t", "s-1").await.unwrap();
        registry.get_or_create("t", "s-2").await.unwrap();
        // Touch s-1 so s-2 becomes the oldest.
        registry.get_or_create("t", "s-1").await.unwrap();
        registry.get_or_create("t", "s-3").await.unwrap();

        assert!(registry.contains("t", "s-1").await);
        assert!(!registry.contains("t", "s-2").await);
        assert!(registry.contains("t", "s-3").await);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_creation_is_not_cached() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.fail_next_create("runtime unavailable").await;
        let registry = registry(Arc::clone(&runtime), 16);

        let err = registry.get_or_create("t", "s-1").await.unwrap_err();
        assert!(err.to_string().contains("runtime unavailable"));
        assert!(!registry.contains("t", "s-1").await);

        // The next attempt retries registration and succeeds.
        registry.get_or_create("t", "s-1").await.unwrap();
        assert!(registry.contains("t", "s-1").await);
    }
}
