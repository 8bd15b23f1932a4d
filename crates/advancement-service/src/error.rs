//! 进度收集服务错误类型定义
//!
//! 请求级错误统一为 `CollectorError`，单条进度、单个玩家的局部错误各自定义在所属模块中，
//! 由调用方记录日志后跳过。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::ApiResponse;

/// 进度收集服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("invalid player id: {0}")]
    InvalidPlayerId(String),

    #[error("failed to open advancement json: {path}")]
    ReadSnapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse advancement: {0}")]
    ParseSnapshot(#[from] serde_json::Error),

    #[error("failed to list advancement directory: {0}")]
    Directory(#[source] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CollectorError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidPlayerId(_) => StatusCode::BAD_REQUEST,
            Self::ReadSnapshot { .. }
            | Self::ParseSnapshot(_)
            | Self::Directory(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            Self::InvalidPlayerId(_) => "INVALID_PLAYER_ID",
            Self::ReadSnapshot { .. } => "SNAPSHOT_READ_ERROR",
            Self::ParseSnapshot(_) => "SNAPSHOT_PARSE_ERROR",
            Self::Directory(_) => "DIRECTORY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::ReadSnapshot { path, source } => {
                tracing::error!(path = %path, error = %source, "读取进度存档失败");
                "failed to open advancement json".to_string()
            }
            Self::ParseSnapshot(e) => {
                tracing::error!(error = %e, "解析进度存档失败");
                "failed to parse advancement".to_string()
            }
            Self::Directory(e) => {
                tracing::error!(error = %e, "扫描进度目录失败");
                "internal server error".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiResponse::<()>::error(self.error_code(), message);
        (status, axum::Json(body)).into_response()
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (
                CollectorError::PlayerNotFound("p".into()),
                StatusCode::NOT_FOUND,
                "PLAYER_NOT_FOUND",
            ),
            (
                CollectorError::InvalidPlayerId("x".into()),
                StatusCode::BAD_REQUEST,
                "INVALID_PLAYER_ID",
            ),
            (
                CollectorError::ReadSnapshot {
                    path: "a.json".into(),
                    source: io_error(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "SNAPSHOT_READ_ERROR",
            ),
            (
                CollectorError::Directory(io_error()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "DIRECTORY_ERROR",
            ),
            (
                CollectorError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status, "{:?}", err);
            assert_eq!(err.error_code(), code);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = CollectorError::Internal("secret path /srv/data".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "INTERNAL_ERROR");
        assert!(!value["message"].as_str().unwrap().contains("/srv/data"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let response = CollectorError::PlayerNotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "player not found: abc");
    }
}
