//! 进度定义注册表
//!
//! 从 advancementlist.yml 加载全部进度定义，服务启动后只读。
//! 注册表决定哪些进度会出现在结果中：存档里有而注册表没有的 key 会被忽略。

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::models::AdvancementDefinition;

/// advancementlist.yml 文件结构
#[derive(Debug, Deserialize)]
struct AdvancementList {
    #[serde(default)]
    advancements: HashMap<String, AdvancementDefinition>,
}

/// 进度定义注册表
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, AdvancementDefinition>,
}

impl DefinitionRegistry {
    pub fn new(definitions: HashMap<String, AdvancementDefinition>) -> Self {
        Self { definitions }
    }

    /// 从 YAML 文本构建
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let list: AdvancementList =
            serde_yaml::from_str(yaml).context("invalid advancement list yaml")?;
        Ok(Self::new(list.advancements))
    }

    /// 从 YAML 文件加载
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let registry = Self::from_yaml_str(&yaml)?;

        info!(
            path = %path.display(),
            count = registry.len(),
            "进度定义已加载"
        );
        Ok(registry)
    }

    pub fn get(&self, key: &str) -> Option<&AdvancementDefinition> {
        self.definitions.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.definitions.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AdvancementDefinition)> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
