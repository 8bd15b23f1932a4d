//! 玩家列表 API 处理器

use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::{
    dto::{ApiResponse, PlayersResponse},
    error::CollectorError,
    state::AppState,
};

/// 获取存档目录中的全部玩家
///
/// GET /api/v1/players
#[instrument(skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PlayersResponse>>, CollectorError> {
    let response = state.collector.players().await?;
    info!(count = response.players.len(), "玩家列表已返回");
    Ok(Json(ApiResponse::success(response)))
}
