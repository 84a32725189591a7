//! Per-application async locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes state changes to the same application within this process.
///
/// Entries are removed once no task holds or waits for them.
#[derive(Clone, Default)]
pub struct ApplicationLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl ApplicationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, application_id: i64) -> ApplicationLockGuard {
        let mutex = Arc::clone(&self.locks.entry(application_id).or_default());
        let guard = mutex.lock_owned().await;
        ApplicationLockGuard {
            guard: Some(guard),
            application_id,
            locks: Arc::clone(&self.locks),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

pub struct ApplicationLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    application_id: i64,
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl Drop for ApplicationLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.application_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_serialized() {
        let locks = ApplicationLocks::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                tokio::spawn(async move {
                    let _guard = locks.acquire(7).await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = ApplicationLocks::new();
        let _first = locks.acquire(1).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;
        assert!(second.is_ok());
    }
}
