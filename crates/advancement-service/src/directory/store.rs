//! 玩家名持久化缓存
//!
//! 以 YAML 文件保存 `players: { <uuid>: { id, name } }`，文件不存在时视为空缓存。

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::PlayerProfile;

/// 持久化缓存错误
#[derive(Debug, thiserror::Error)]
pub enum DirectoryStoreError {
    #[error("player cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("player cache yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// 玩家名持久化接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// 加载全部玩家资料，不存在时返回空映射
    async fn load(&self) -> Result<HashMap<String, PlayerProfile>, DirectoryStoreError>;

    /// 保存全部玩家资料
    async fn save(
        &self,
        players: &HashMap<String, PlayerProfile>,
    ) -> Result<(), DirectoryStoreError>;
}

/// playercache.yml 文件结构
#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayerCacheFile {
    #[serde(default)]
    players: HashMap<String, PlayerProfile>,
}

/// YAML 文件实现
#[derive(Debug, Clone)]
pub struct YamlDirectoryStore {
    path: PathBuf,
}

impl YamlDirectoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DirectoryStore for YamlDirectoryStore {
    async fn load(&self) -> Result<HashMap<String, PlayerProfile>, DirectoryStoreError> {
        let yaml = match tokio::fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let file: PlayerCacheFile = serde_yaml::from_str(&yaml)?;
        Ok(file.players)
    }

    async fn save(
        &self,
        players: &HashMap<String, PlayerProfile>,
    ) -> Result<(), DirectoryStoreError> {
        let yaml = serde_yaml::to_string(&PlayerCacheFile {
            players: players.clone(),
        })?;
        tokio::fs::write(&self.path, yaml).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> PlayerProfile {
        PlayerProfile {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlDirectoryStore::new(dir.path().join("playercache.yml"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlDirectoryStore::new(dir.path().join("playercache.yml"));

        let players = HashMap::from([
            ("a".to_string(), profile("a", "Alex")),
            ("s".to_string(), profile("s", "Steve")),
        ]);
        store.save(&players).await.unwrap();

        assert_eq!(store.load().await.unwrap(), players);
    }

    #[tokio::test]
    async fn test_load_existing_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playercache.yml");
        std::fs::write(&path, "players:\n  a:\n    id: a\n    name: Alex\n").unwrap();

        let players = YamlDirectoryStore::new(path).load().await.unwrap();
        assert_eq!(players["a"].name, "Alex");
    }

    #[tokio::test]
    async fn test_save_to_missing_directory_fails() {
        let store = YamlDirectoryStore::new("/nonexistent/dir/playercache.yml");
        let err = store.save(&HashMap::new()).await.unwrap_err();
        assert!(matches!(err, DirectoryStoreError::Io(_)));
    }
}
