//! 进度相关枚举类型定义
//!
//! 所有枚举都支持 YAML/JSON（serde）序列化，取值与游戏数据保持一致。

use serde::{Deserialize, Serialize};

/// 进度类型
///
/// 决定前端展示的边框样式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancementType {
    /// 普通任务
    #[default]
    Task,
    /// 目标
    Goal,
    /// 挑战
    Challenge,
}

/// 进度计算方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculateRule {
    /// 满足任一条件即达成，进度分母固定为 1
    #[serde(rename = "oneof")]
    OneOf,
    /// 需要满足全部条件，进度分母为条件数
    #[default]
    #[serde(rename = "allof")]
    AllOf,
}

impl CalculateRule {
    /// 计算达成所需的条件数
    pub fn required(&self, criteria_count: usize) -> u32 {
        match self {
            Self::OneOf => 1,
            Self::AllOf => criteria_count as u32,
        }
    }
}

/// 进度可见性过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityPolicy {
    /// 全部进度
    #[serde(rename = "all")]
    All,
    /// 仅已达成
    #[serde(rename = "done")]
    CompletedOnly,
    /// 已达成，以及父/祖父进度已达成的进度
    #[default]
    #[serde(rename = "progress")]
    Progressive,
}

impl VisibilityPolicy {
    /// 从查询参数解析，缺省或无法识别时回退到 Progressive
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("all") => Self::All,
            Some("done") => Self::CompletedOnly,
            _ => Self::Progressive,
        }
    }
}
