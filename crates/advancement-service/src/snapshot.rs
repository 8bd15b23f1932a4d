//! 玩家进度存档读取
//!
//! 存档目录下每个玩家一个 `<uuid>.json`，除 `DataVersion` 外的每个字段都是一条原始进度。
//! 文件修改时间作为结果集的 `updated`。

use std::collections::{BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::error::{CollectorError, Result};
use crate::models::RawAdvancement;

/// 存档中非进度的版本字段
pub const RESERVED_VERSION_FIELD: &str = "DataVersion";

const SNAPSHOT_EXTENSION: &str = "json";

/// 读取到的原始存档
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub advancements: HashMap<String, RawAdvancement>,
    /// 文件最后修改时间
    pub updated: DateTime<Utc>,
}

/// 进度存档目录
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 玩家 ID 对应的存档路径，ID 含路径成分时返回 None
    fn snapshot_path(&self, player_id: &str) -> Option<PathBuf> {
        let invalid = player_id.is_empty()
            || player_id.starts_with('.')
            || player_id.contains(['/', '\\']);
        if invalid {
            return None;
        }
        Some(
            self.base_path
                .join(format!("{}.{}", player_id, SNAPSHOT_EXTENSION)),
        )
    }

    /// 读取玩家存档
    #[instrument(skip(self))]
    pub async fn load(&self, player_id: &str) -> Result<RawSnapshot> {
        let path = self
            .snapshot_path(player_id)
            .ok_or_else(|| CollectorError::PlayerNotFound(player_id.to_string()))?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(CollectorError::PlayerNotFound(player_id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CollectorError::PlayerNotFound(player_id.to_string()));
            }
            Err(source) => {
                return Err(CollectorError::ReadSnapshot {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| CollectorError::ReadSnapshot {
                path: path.display().to_string(),
                source,
            })?;

        let advancements = parse_snapshot(&bytes).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "进度存档格式错误");
        })?;

        let updated = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|source| CollectorError::ReadSnapshot {
                path: path.display().to_string(),
                source,
            })?;

        Ok(RawSnapshot {
            advancements,
            updated,
        })
    }

    /// 扫描存档目录，返回所有玩家 ID（文件名去掉扩展名）
    ///
    /// 目录本身无法读取时返回错误，单个条目异常时跳过。
    #[instrument(skip(self))]
    pub async fn player_ids(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(CollectorError::Directory)?;

        let mut ids = BTreeSet::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "读取存档目录条目失败，跳过");
                    continue;
                }
            };

            let file_name = entry.file_name();
            match player_id_from_file_name(&file_name.to_string_lossy()) {
                Some(id) => {
                    ids.insert(id);
                }
                None => warn!(file = ?file_name, "无法从文件名解析玩家 ID，跳过"),
            }
        }

        Ok(ids.into_iter().collect())
    }
}

/// 取文件名第一个 `.` 之前的部分作为玩家 ID
fn player_id_from_file_name(file_name: &str) -> Option<String> {
    let id = file_name.split('.').next().unwrap_or_default().trim();
    (!id.is_empty()).then(|| id.to_string())
}

/// 解析存档内容
///
/// 先按通用对象读取并移除版本字段，再逐条按原始进度结构严格解析。
fn parse_snapshot(bytes: &[u8]) -> Result<HashMap<String, RawAdvancement>> {
    let mut object: Map<String, Value> = serde_json::from_slice(bytes)?;
    object.remove(RESERVED_VERSION_FIELD);

    let advancements = serde_json::from_value(Value::Object(object))?;
    Ok(advancements)
}
