//! 健康检查

use axum::Json;

use crate::dto::HealthResponse;

/// 健康检查
///
/// GET /api/v1/healthcheck
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { message: "healthy" })
}
