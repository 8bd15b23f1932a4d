//! 玩家进度模型
//!
//! 包含从存档读取的原始进度、转换后的展示用进度，以及按玩家聚合的结果集。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AdvancementType;

/// 存档中的原始进度
///
/// criteria 的值为 `YYYY-MM-DD HH:MM:SS ±HHMM` 格式的达成时间
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAdvancement {
    #[serde(default)]
    pub criteria: HashMap<String, String>,
    #[serde(default)]
    pub done: bool,
}

/// 进度统计
///
/// 单个进度中表示条件达成数，汇总中表示进度达成数
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancementProgress {
    pub total: u32,
    pub done: u32,
    /// 达成率，截断到小数点后三位
    pub percentage: f64,
}

/// 进度图标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayIcon {
    pub url: String,
    pub invsprite: bool,
    /// 精灵图偏移，仅 invsprite 为 true 时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posx: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posy: Option<i32>,
}

/// 进度展示信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancementDisplay {
    pub title: String,
    pub description: String,
    pub icon: DisplayIcon,
}

/// 玩家进度（转换后）
///
/// 生成后不再修改，缓存刷新时整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAdvancement {
    pub key: String,
    pub parent: String,
    pub display: AdvancementDisplay,
    #[serde(rename = "type")]
    pub advancement_type: AdvancementType,
    pub hidden: bool,
    pub done: bool,
    /// 条件名 -> 达成时间，未达成为 null
    pub criteria: BTreeMap<String, Option<DateTime<FixedOffset>>>,
    pub progress: AdvancementProgress,
}

/// 玩家进度结果集
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecordSet {
    pub advancements: HashMap<String, Arc<PlayerAdvancement>>,
    /// 全部进度的汇总，过滤后仍保持不变
    pub progress: AdvancementProgress,
    /// 存档文件的最后修改时间
    pub updated: DateTime<Utc>,
    /// 结果集的计算时间
    pub cached: DateTime<Utc>,
}

impl PlayerRecordSet {
    /// 按 key 获取进度
    pub fn get(&self, key: &str) -> Option<&PlayerAdvancement> {
        self.advancements.get(key).map(Arc::as_ref)
    }

    /// 父进度是否存在且已达成
    pub fn is_parent_done(&self, advancement: &PlayerAdvancement) -> bool {
        self.parent_of(advancement).is_some_and(|parent| parent.done)
    }

    /// 获取父进度
    pub fn parent_of(&self, advancement: &PlayerAdvancement) -> Option<&PlayerAdvancement> {
        self.get(&advancement.parent)
    }
}

/// 玩家资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
}
