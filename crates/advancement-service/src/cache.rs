//! 玩家进度结果缓存
//!
//! 按玩家 ID 缓存完整结果集，TTL 内直接返回缓存（不检查存档文件是否变化），
//! 过期或未命中时重新计算并整体替换。计算失败不写入缓存，同时移除该玩家已过期的条目。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use advancement_shared::observability::metrics;

use crate::error::Result;
use crate::models::PlayerRecordSet;

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record_set: Arc<PlayerRecordSet>,
    pub computed_at: DateTime<Utc>,
}

impl CacheEntry {
    /// `now < computed_at + ttl` 时有效
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.computed_at).to_std() {
            Ok(elapsed) => elapsed < ttl,
            // 计算时间晚于当前时间（时钟回拨）时视为有效
            Err(_) => true,
        }
    }
}

/// 玩家进度结果缓存
///
/// DashMap 保证单个 key 的替换是原子的，读者不会看到写了一半的条目
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// 以秒为单位配置 TTL
    pub fn with_ttl_seconds(ttl_seconds: u64) -> Self {
        Self::new(Duration::from_secs(ttl_seconds))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 获取 TTL 内的缓存
    pub fn get(&self, player_id: &str) -> Option<Arc<PlayerRecordSet>> {
        let now = Utc::now();
        self.entries
            .get(player_id)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.record_set))
    }

    /// 写入（替换）缓存
    pub fn insert(&self, player_id: &str, record_set: Arc<PlayerRecordSet>) {
        let entry = CacheEntry {
            computed_at: record_set.cached,
            record_set,
        };
        self.entries.insert(player_id.to_string(), entry);
    }

    /// 移除缓存
    pub fn invalidate(&self, player_id: &str) {
        self.entries.remove(player_id);
    }

    /// 是否存在条目（不论是否过期）
    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取缓存，未命中或过期时调用 `compute` 重新计算
    pub async fn get_or_compute<F, Fut>(
        &self,
        player_id: &str,
        compute: F,
    ) -> Result<Arc<PlayerRecordSet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PlayerRecordSet>>,
    {
        if let Some(cached) = self.get(player_id) {
            metrics::record_cache_lookup(true);
            debug!(player_id = %player_id, "命中进度缓存");
            return Ok(cached);
        }
        metrics::record_cache_lookup(false);

        match compute().await {
            Ok(record_set) => {
                let record_set = Arc::new(record_set);
                self.insert(player_id, Arc::clone(&record_set));
                info!(
                    player_id = %player_id,
                    cached_at = %record_set.cached,
                    "进度缓存已刷新"
                );
                Ok(record_set)
            }
            Err(e) => {
                let now = Utc::now();
                self.entries
                    .remove_if(player_id, |_, entry| !entry.is_fresh(now, self.ttl));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;
    use crate::models::AdvancementProgress;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record_set() -> PlayerRecordSet {
        PlayerRecordSet {
            advancements: HashMap::new(),
            progress: AdvancementProgress::default(),
            updated: Utc::now(),
            cached: Utc::now(),
        }
    }

    #[test]
    fn test_entry_freshness() {
        let now = Utc::now();
        let entry = CacheEntry {
            record_set: Arc::new(record_set()),
            computed_at: now - chrono::Duration::seconds(30),
        };

        assert!(entry.is_fresh(now, Duration::from_secs(60)));
        assert!(!entry.is_fresh(now, Duration::from_secs(30)));
        assert!(!entry.is_fresh(now, Duration::ZERO));
    }

    #[tokio::test]
    async fn test_get_or_compute_within_ttl() {
        let cache = ResultCache::with_ttl_seconds(60);
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let first = cache
            .get_or_compute("p", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record_set())
            })
            .await
            .unwrap();
        let second = cache
            .get_or_compute("p", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record_set())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.cached, second.cached);
    }

    #[tokio::test]
    async fn test_get_or_compute_after_expiry() {
        let cache = ResultCache::with_ttl_seconds(0);
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            cache
                .get_or_compute("p", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(record_set())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ResultCache::with_ttl_seconds(60);

        let err = cache
            .get_or_compute("missing", || async {
                Err(CollectorError::PlayerNotFound("missing".to_string()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CollectorError::PlayerNotFound(_)));
        assert!(!cache.contains("missing"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_failure_evicts_expired_entry() {
        let cache = ResultCache::with_ttl_seconds(0);
        cache.insert("p", Arc::new(record_set()));
        assert!(cache.contains("p"));

        let _ = cache
            .get_or_compute("p", || async {
                Err(CollectorError::PlayerNotFound("p".to_string()))
            })
            .await;

        assert!(!cache.contains("p"));
    }

    #[test]
    fn test_invalidate() {
        let cache = ResultCache::with_ttl_seconds(60);
        cache.insert("p", Arc::new(record_set()));
        assert!(cache.get("p").is_some());

        cache.invalidate("p");
        assert!(cache.get("p").is_none());
        assert_eq!(cache.len(), 0);
    }
}
