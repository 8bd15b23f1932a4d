//! 进度查询 API 处理器

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::{
    dto::{AdvancementAssetsResponse, AdvancementQuery, ApiResponse, PlayerAdvancementResponse},
    error::CollectorError,
    state::AppState,
};

/// 获取玩家进度
///
/// GET /api/v1/advancement/{id}?condition=all|done|progress
#[instrument(skip(state))]
pub async fn get_advancement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AdvancementQuery>,
) -> Result<Json<ApiResponse<PlayerAdvancementResponse>>, CollectorError> {
    let response = state.collector.advancement(&id, query.policy()).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// 获取进度背景图配置
///
/// GET /api/v1/advancement/assets
pub async fn get_assets(
    State(state): State<AppState>,
) -> Json<ApiResponse<AdvancementAssetsResponse>> {
    Json(ApiResponse::success(state.collector.assets()))
}
