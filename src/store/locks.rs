//! Per-asset serialization of loads and saves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::AssetId;

/// Table of async guards keyed by asset id.
///
/// Holding an asset's guard orders every load and save of that asset; guards of
/// different assets are independent, so their operations may overlap.
#[derive(Debug, Clone, Default)]
pub struct AssetLocks {
    locks: Arc<Mutex<HashMap<AssetId, Arc<AsyncMutex<()>>>>>,
}

impl AssetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other operation holds `asset_id`, then hold it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, asset_id: &AssetId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(asset_id.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop `guard` and forget the asset's entry if nobody else holds or
    /// awaits it.
    pub fn release(&self, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.prune();
    }

    /// Drop entries nobody is waiting on.
    pub fn prune(&self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of assets with a tracked guard.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_asset_is_serialized() {
        let locks = AssetLocks::new();
        let a = AssetId::from("a");

        let guard = locks.acquire(&a).await;
        let wait = std::time::Duration::from_millis(20);
        let pending = tokio::time::timeout(wait, locks.acquire(&a)).await;
        assert!(pending.is_err());

        drop(guard);
        let _again = locks.acquire(&a).await;
    }

    #[tokio::test]
    async fn test_different_assets_are_independent() {
        let locks = AssetLocks::new();
        let _a = locks.acquire(&AssetId::from("a")).await;
        let _b = locks.acquire(&AssetId::from("b")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_prune_drops_idle_entries() {
        let locks = AssetLocks::new();
        {
            let _guard = locks.acquire(&AssetId::from("a")).await;
            locks.prune();
            assert_eq!(locks.len(), 1);
        }
        locks.prune();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_release_keeps_entries_with_waiters() {
        let locks = AssetLocks::new();
        let a = AssetId::from("a");

        let first = locks.acquire(&a).await;
        let waiter = {
            let locks = locks.clone();
            let a = a.clone();
            tokio::spawn(async move {
                let guard = locks.acquire(&a).await;
                locks.release(guard);
            })
        };
        tokio::task::yield_now().await;

        locks.release(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
