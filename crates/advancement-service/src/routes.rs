//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// 构建 API 路由，挂载在 /api/v1 下
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(handlers::health::healthcheck))
        .route("/players", get(handlers::player::list_players))
        // 静态路径优先于 {id} 匹配
        .route("/advancement/assets", get(handlers::advancement::get_assets))
        .route(
            "/advancement/{id}",
            get(handlers::advancement::get_advancement),
        )
}
