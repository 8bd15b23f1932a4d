//! 进度定义（静态配置）
//!
//! 对应 advancementlist.yml 中的单条记录，服务启动后只读。

use serde::{Deserialize, Serialize};

use super::enums::{AdvancementType, CalculateRule};

/// 进度定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancementDefinition {
    /// 达成所需的条件名
    #[serde(default)]
    pub criteria: Vec<String>,
    /// 父进度 key，空字符串表示根进度
    #[serde(default)]
    pub parent: String,
    /// 语言文件中的 key 前缀
    #[serde(default)]
    pub language_key: String,
    #[serde(default)]
    pub calculate: CalculateRule,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, rename = "type")]
    pub advancement_type: AdvancementType,
    #[serde(default)]
    pub icon: DefinitionIcon,
}

/// 进度图标配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionIcon {
    #[serde(default)]
    pub url: String,
    /// 是否使用物品栏精灵图
    #[serde(default)]
    pub invsprite: bool,
    /// 精灵图中的位置（从 1 开始）
    #[serde(default)]
    pub pos: i32,
}
