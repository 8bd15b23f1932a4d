//! 进度收集服务
//!
//! 组合存档读取、进度转换、汇总、结果缓存和玩家目录，对外提供按玩家查询的接口。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use advancement_shared::config::AssetsConfig;

use crate::aggregate::summarize;
use crate::cache::ResultCache;
use crate::directory::PlayerDirectory;
use crate::dto::{AdvancementAssetsResponse, PlayerAdvancementResponse, PlayersResponse};
use crate::error::{CollectorError, Result};
use crate::filter;
use crate::models::{PlayerRecordSet, VisibilityPolicy};
use crate::reconcile::Reconciler;
use crate::snapshot::SnapshotStore;

/// 进度收集服务
pub struct AdvancementCollector {
    snapshots: SnapshotStore,
    reconciler: Reconciler,
    cache: ResultCache,
    directory: PlayerDirectory,
    assets: AssetsConfig,
}

impl AdvancementCollector {
    pub fn new(
        snapshots: SnapshotStore,
        reconciler: Reconciler,
        cache: ResultCache,
        directory: PlayerDirectory,
        assets: AssetsConfig,
    ) -> Self {
        Self {
            snapshots,
            reconciler,
            cache,
            directory,
            assets,
        }
    }

    /// 校验玩家 ID 为 UUID
    pub fn validate_player_id(player_id: &str) -> Result<()> {
        Uuid::parse_str(player_id)
            .map(|_| ())
            .map_err(|_| CollectorError::InvalidPlayerId(player_id.to_string()))
    }

    /// 存档目录中的全部玩家，按 ID 排序
    #[instrument(skip(self))]
    pub async fn players(&self) -> Result<PlayersResponse> {
        let ids = self.snapshots.player_ids().await?;
        let players = self.directory.resolve_all(ids).await?;
        Ok(PlayersResponse { players })
    }

    /// 获取玩家的完整结果集，TTL 内返回缓存
    #[instrument(skip(self))]
    pub async fn load(&self, player_id: &str) -> Result<Arc<PlayerRecordSet>> {
        self.cache
            .get_or_compute(player_id, || self.compute(player_id))
            .await
    }

    async fn compute(&self, player_id: &str) -> Result<PlayerRecordSet> {
        let snapshot = self.snapshots.load(player_id).await?;
        let advancements = self.reconciler.reconcile(snapshot.advancements).await;
        let progress = summarize(&advancements);

        info!(
            player_id = %player_id,
            total = progress.total,
            done = progress.done,
            "玩家进度已重新计算"
        );

        Ok(PlayerRecordSet {
            advancements,
            progress,
            updated: snapshot.updated,
            cached: Utc::now(),
        })
    }

    /// 按可见性条件过滤
    pub fn filter(&self, policy: VisibilityPolicy, record_set: &PlayerRecordSet) -> PlayerRecordSet {
        filter::filter(policy, record_set)
    }

    /// 生成响应体
    pub fn response(&self, record_set: &PlayerRecordSet) -> PlayerAdvancementResponse {
        PlayerAdvancementResponse::from(record_set)
    }

    /// 校验、加载、过滤并生成响应
    pub async fn advancement(
        &self,
        player_id: &str,
        policy: VisibilityPolicy,
    ) -> Result<PlayerAdvancementResponse> {
        Self::validate_player_id(player_id)?;
        let record_set = self.load(player_id).await?;
        let visible = self.filter(policy, &record_set);
        Ok(self.response(&visible))
    }

    /// 进度背景图配置
    pub fn assets(&self) -> AdvancementAssetsResponse {
        AdvancementAssetsResponse::from(&self.assets)
    }
}
