//! 玩家目录
//!
//! 已知玩家直接返回缓存的资料，未知玩家并发查询资料服务，
//! 查询成功后写入内存并持久化，查询失败的玩家从结果中省略。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use advancement_shared::observability::metrics;

use super::lookup::IdentityLookup;
use super::store::{DirectoryStore, DirectoryStoreError};
use crate::error::{CollectorError, Result};
use crate::models::PlayerProfile;

/// 玩家目录
pub struct PlayerDirectory {
    profiles: Arc<RwLock<HashMap<String, PlayerProfile>>>,
    lookup: Arc<dyn IdentityLookup>,
    store: Arc<dyn DirectoryStore>,
}

impl PlayerDirectory {
    pub fn new(
        lookup: Arc<dyn IdentityLookup>,
        store: Arc<dyn DirectoryStore>,
        profiles: HashMap<String, PlayerProfile>,
    ) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(profiles)),
            lookup,
            store,
        }
    }

    /// 从持久化缓存加载已知玩家
    pub async fn load(
        lookup: Arc<dyn IdentityLookup>,
        store: Arc<dyn DirectoryStore>,
    ) -> std::result::Result<Self, DirectoryStoreError> {
        let profiles = store.load().await?;
        info!(count = profiles.len(), "玩家缓存已加载");
        Ok(Self::new(lookup, store, profiles))
    }

    /// 已缓存的玩家数
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }

    /// 获取已缓存的玩家资料
    pub async fn get(&self, id: &str) -> Option<PlayerProfile> {
        self.profiles.read().await.get(id).cloned()
    }

    /// 解析全部玩家 ID，结果按 ID 排序
    pub async fn resolve_all<I>(&self, ids: I) -> Result<Vec<PlayerProfile>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut tasks = JoinSet::new();
        for id in ids {
            let profiles = Arc::clone(&self.profiles);
            let lookup = Arc::clone(&self.lookup);
            let store = Arc::clone(&self.store);
            tasks.spawn(async move {
                resolve_one(&profiles, lookup.as_ref(), store.as_ref(), id).await
            });
        }

        let mut resolved = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let profile = joined.map_err(|e| {
                error!(error = %e, "玩家解析任务异常退出");
                CollectorError::Internal(format!("player resolve task failed: {e}"))
            })?;
            resolved.extend(profile);
        }

        resolved.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(resolved)
    }
}

async fn resolve_one(
    profiles: &RwLock<HashMap<String, PlayerProfile>>,
    lookup: &dyn IdentityLookup,
    store: &dyn DirectoryStore,
    id: String,
) -> Option<PlayerProfile> {
    if let Some(profile) = profiles.read().await.get(&id) {
        metrics::record_identity_lookup("cached");
        return Some(profile.clone());
    }

    let profile = match lookup.lookup(&id).await {
        Ok(profile) => profile,
        Err(e) => {
            metrics::record_identity_lookup("failed");
            warn!(player_id = %id, error = %e, "玩家资料查询失败");
            return None;
        }
    };
    metrics::record_identity_lookup("resolved");

    // 写锁覆盖插入和持久化，保存的快照不会丢失并发写入
    let mut guard = profiles.write().await;
    guard.insert(id.clone(), profile.clone());
    match store.save(&guard).await {
        Ok(()) => debug!(player_id = %id, name = %profile.name, "玩家缓存已保存"),
        Err(e) => error!(player_id = %id, error = %e, "玩家缓存保存失败"),
    }

    Some(profile)
}
