//! Per-user operation lock
//!
//! Serializes balance-mutating operations (conversions) per user within one
//! running process. Overlapping attempts are rejected, not queued: the
//! second caller gets `false` and must surface an "already in progress"
//! message or retry on its own.
//!
//! The lock is process-local. It confers no protection across multiple
//! instances or devices for the same user; closing that gap requires an
//! atomic acquire in the shared store (conditional write keyed by user id
//! and expiry). TTL expiry is the only recovery from a caller that crashed
//! between acquire and release.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default lock lifetime before an abandoned lock is reclaimable.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30);

/// Transient lock record. Never persisted.
#[derive(Debug, Clone)]
struct LockRecord {
    operation: String,
    acquired_at: Instant,
    expires_at: Instant,
}

/// In-memory TTL-bounded mutex keyed by user id.
///
/// Constructed once and passed by reference to callers; tests get isolated
/// behavior by constructing their own manager instances.
#[derive(Debug)]
pub struct OperationLockManager {
    locks: Mutex<HashMap<String, LockRecord>>,
    ttl: Duration,
}

impl Default for OperationLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationLockManager {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_LOCK_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Try to acquire the lock for a user.
    ///
    /// Returns `true` and records the lock when no unexpired lock exists;
    /// returns `false` otherwise, leaving the existing lock untouched.
    /// Never panics.
    pub fn acquire(&self, user_id: &str, operation: &str) -> bool {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if let Some(existing) = locks.get(user_id) {
            if existing.expires_at > now {
                tracing::warn!(
                    user_id,
                    operation,
                    in_flight = %existing.operation,
                    "operation already in progress for this user"
                );
                return false;
            }

            tracing::warn!(
                user_id,
                abandoned = %existing.operation,
                "reclaiming expired lock"
            );
            locks.remove(user_id);
        }

        locks.insert(
            user_id.to_string(),
            LockRecord {
                operation: operation.to_string(),
                acquired_at: now,
                expires_at: now + self.ttl,
            },
        );

        tracing::debug!(user_id, operation, "lock acquired");
        true
    }

    /// Release a user's lock. No-op if none is held.
    pub fn release(&self, user_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = locks.remove(user_id) {
            tracing::debug!(
                user_id,
                operation = %record.operation,
                held_ms = record.acquired_at.elapsed().as_millis() as u64,
                "lock released"
            );
        }
    }

    /// Whether an unexpired lock exists for the user. Expired locks are
    /// lazily deleted here.
    pub fn has_active(&self, user_id: &str) -> bool {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

        match locks.get(user_id) {
            Some(record) if record.expires_at > Instant::now() => true,
            Some(_) => {
                locks.remove(user_id);
                false
            }
            None => false,
        }
    }

    /// Drop every lock. Debugging escape hatch only.
    pub fn clear_all(&self) {
        tracing::warn!("clearing all operation locks");
        self.locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let manager = OperationLockManager::new();

        assert!(manager.acquire("u1", "convert"));
        assert!(!manager.acquire("u1", "convert"));
        // A different operation name changes nothing; the user is locked.
        assert!(!manager.acquire("u1", "convert2"));

        manager.release("u1");
        assert!(manager.acquire("u1", "convert"));
    }

    #[test]
    fn locks_are_independent_across_users() {
        let manager = OperationLockManager::new();

        assert!(manager.acquire("u1", "convert"));
        assert!(manager.acquire("u2", "convert"));
        assert!(manager.has_active("u1"));
        assert!(manager.has_active("u2"));
    }

    #[test]
    fn release_without_lock_is_a_noop() {
        let manager = OperationLockManager::new();
        manager.release("u1");
        assert!(!manager.has_active("u1"));
    }

    #[tokio::test]
    async fn expired_lock_can_be_reacquired() {
        let manager = OperationLockManager::with_ttl(Duration::from_millis(10));

        assert!(manager.acquire("u1", "convert"));
        tokio::time::sleep(Duration::from_millis(30)).await;

        // No release happened; expiry alone makes the user lockable again.
        assert!(manager.acquire("u1", "convert2"));
    }

    #[tokio::test]
    async fn has_active_lazily_reclaims_expired_locks() {
        let manager = OperationLockManager::with_ttl(Duration::from_millis(10));

        assert!(manager.acquire("u1", "convert"));
        assert!(manager.has_active("u1"));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!manager.has_active("u1"));
    }

    #[test]
    fn clear_all_drops_every_lock() {
        let manager = OperationLockManager::new();
        assert!(manager.acquire("u1", "convert"));
        assert!(manager.acquire("u2", "convert"));

        manager.clear_all();
        assert!(!manager.has_active("u1"));
        assert!(!manager.has_active("u2"));
    }

    #[test]
    fn concurrent_acquires_admit_exactly_one_winner() {
        use std::sync::Arc;

        let manager = Arc::new(OperationLockManager::new());
        let mut handles = Vec::new();

        for _ in 0..10 {
            let manager = Arc::clone(&manager);
            handles.push(std::thread::spawn(move || manager.acquire("u1", "convert")));
        }

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().expect("acquire thread panicked"))
            .filter(|acquired| *acquired)
            .count();

        assert_eq!(wins, 1);
        assert!(manager.has_active("u1"));
    }
}
