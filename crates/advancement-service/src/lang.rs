//! 语言文件
//!
//! 游戏语言文件是扁平的 key -> 文本映射，进度标题和说明分别以
//! `.title` / `.description` 为后缀。

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tracing::info;

pub const LANG_SUFFIX_TITLE: &str = ".title";
pub const LANG_SUFFIX_DESCRIPTION: &str = ".description";

/// 语言映射
#[derive(Debug, Clone, Default)]
pub struct LanguageMapping {
    mapping: HashMap<String, String>,
}

impl LanguageMapping {
    pub fn new(mapping: HashMap<String, String>) -> Self {
        Self { mapping }
    }

    /// 加载 `{dir}/{language}.json`
    pub fn load(dir: impl AsRef<Path>, language: &str) -> anyhow::Result<Self> {
        let path = dir.as_ref().join(format!("{}.json", language));
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mapping: HashMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("invalid language file {}", path.display()))?;

        info!(path = %path.display(), entries = mapping.len(), "语言文件已加载");
        Ok(Self::new(mapping))
    }

    /// 查找文本，缺失时返回空字符串
    pub fn get(&self, key: &str) -> &str {
        self.mapping.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn title(&self, language_key: &str) -> String {
        self.get(&format!("{}{}", language_key, LANG_SUFFIX_TITLE))
            .to_string()
    }

    pub fn description(&self, language_key: &str) -> String {
        self.get(&format!("{}{}", language_key, LANG_SUFFIX_DESCRIPTION))
            .to_string()
    }
}
