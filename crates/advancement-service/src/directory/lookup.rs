//! 玩家资料查询
//!
//! 通过 Mojang 会话服务器将 UUID 解析为玩家名。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::models::PlayerProfile;

/// 玩家资料查询错误
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("profile not found: {id} (status {status})")]
    NotFound { id: String, status: StatusCode },

    #[error("profile request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid profile response: {0}")]
    Decode(String),
}

/// 玩家资料查询接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// 查询玩家名，返回的 id 与传入的 id 一致
    async fn lookup(&self, id: &str) -> Result<PlayerProfile, LookupError>;
}

/// 会话服务器返回的资料，只取玩家名（返回的 id 不带连字符）
#[derive(Debug, Deserialize)]
struct SessionProfile {
    name: String,
}

/// Mojang 会话服务器客户端
pub struct MojangProfileClient {
    client: reqwest::Client,
    base_url: String,
}

impl MojangProfileClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn profile_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl IdentityLookup for MojangProfileClient {
    #[instrument(skip(self))]
    async fn lookup(&self, id: &str) -> Result<PlayerProfile, LookupError> {
        let response = self.client.get(self.profile_url(id)).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::NotFound {
                id: id.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let profile: SessionProfile =
            serde_json::from_slice(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        Ok(PlayerProfile {
            id: id.to_string(),
            name: profile.name,
        })
    }
}
