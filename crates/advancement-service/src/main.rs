//! Minecraft 进度收集服务
//!
//! 提供玩家列表、玩家进度、进度资源配置的 REST API。

use std::sync::Arc;
use std::time::Duration;

use advancement_service::{
    AdvancementCollector,
    cache::ResultCache,
    directory::{MojangProfileClient, PlayerDirectory, YamlDirectoryStore},
    lang::LanguageMapping,
    reconcile::Reconciler,
    registry::DefinitionRegistry,
    routes,
    snapshot::SnapshotStore,
    state::AppState,
};
use advancement_shared::{
    config::{AppConfig, CorsConfig},
    observability::{self, middleware as obs_middleware},
};
use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/default.toml → config/{env}.toml → 环境变量
    // tracing 尚未初始化，加载失败只能输出到 stderr
    let config = AppConfig::load("advancement-collector").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting advancement-collector on {}", config.server_addr());

    let settings = &config.collector;

    // 进度定义和语言文件在启动时加载，之后只读
    let registry = Arc::new(DefinitionRegistry::load(&settings.definitions_path)?);
    let lang = Arc::new(LanguageMapping::load(&settings.lang_dir, &settings.language)?);

    let lookup = Arc::new(MojangProfileClient::new(
        settings.profile_api_url.clone(),
        Duration::from_secs(settings.lookup_timeout_seconds),
    )?);
    let store = Arc::new(YamlDirectoryStore::new(&settings.player_cache_path));
    let directory = PlayerDirectory::load(lookup, store).await?;

    let collector = AdvancementCollector::new(
        SnapshotStore::new(&settings.advancement_path),
        Reconciler::new(registry, lang),
        ResultCache::with_ttl_seconds(settings.cache_seconds),
        directory,
        config.assets.clone(),
    );
    let state = AppState::new(Arc::new(collector));

    let app = Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(cors_layer(&config.cors, config.is_production()))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 构建 CORS 层，只允许 GET / OPTIONS
fn cors_layer(config: &CorsConfig, production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        if production {
            warn!("cors.allowed_origins 包含 \"*\"，生产环境请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return layer.allow_origin(Any);
    }

    info!("CORS allowed_origins: {}", config.allowed_origins.join(","));
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect();
    layer.allow_origin(origins)
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
