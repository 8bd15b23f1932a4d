//! 响应 DTO 定义
//!
//! REST API 的查询参数和响应体结构

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use advancement_shared::config::AssetsConfig;

use crate::models::{
    AdvancementProgress, PlayerAdvancement, PlayerProfile, PlayerRecordSet, VisibilityPolicy,
};

/// 进度查询参数
#[derive(Debug, Default, Deserialize)]
pub struct AdvancementQuery {
    /// all | done | progress，缺省或无法识别时为 progress
    pub condition: Option<String>,
}

impl AdvancementQuery {
    pub fn policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::from_query(self.condition.as_deref())
    }
}

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// 创建错误响应
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// 玩家列表响应
#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerProfile>,
}

/// 玩家进度响应
///
/// 进度按 key 排序，`progress` 为过滤前全部进度的汇总
#[derive(Debug, Serialize)]
pub struct PlayerAdvancementResponse {
    pub advancements: Vec<Arc<PlayerAdvancement>>,
    pub progress: AdvancementProgress,
    pub updated: DateTime<Utc>,
    pub cached: DateTime<Utc>,
}

impl From<&PlayerRecordSet> for PlayerAdvancementResponse {
    fn from(record_set: &PlayerRecordSet) -> Self {
        let mut advancements: Vec<Arc<PlayerAdvancement>> =
            record_set.advancements.values().cloned().collect();
        advancements.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            advancements,
            progress: record_set.progress,
            updated: record_set.updated,
            cached: record_set.cached,
        }
    }
}

/// 进度背景图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancementAssetsBackground {
    pub incomplete: String,
    pub completed: String,
}

/// 进度资源响应
#[derive(Debug, Serialize)]
pub struct AdvancementAssetsResponse {
    pub background: HashMap<String, AdvancementAssetsBackground>,
}

impl From<&AssetsConfig> for AdvancementAssetsResponse {
    fn from(config: &AssetsConfig) -> Self {
        let background = config
            .background
            .iter()
            .map(|(kind, asset)| {
                (
                    kind.clone(),
                    AdvancementAssetsBackground {
                        incomplete: asset.incomplete.clone(),
                        completed: asset.completed.clone(),
                    },
                )
            })
            .collect();

        Self { background }
    }
}
