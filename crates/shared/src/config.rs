//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 18080,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识日志和指标的来源
    pub service_name: String,
    pub log_level: String,
    /// 是否启用 JSON 格式日志
    pub json_logs: bool,
    pub metrics_enabled: bool,
    /// Prometheus 指标导出端口
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    /// 注入服务名（服务名以 AppConfig 顶层为准）
    pub fn with_service_name(mut self, service_name: &str) -> Self {
        self.service_name = service_name.to_string();
        self
    }
}

/// 进度收集配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 玩家进度 JSON 所在目录（每个玩家一个 `<uuid>.json`）
    pub advancement_path: String,
    /// 进度定义 YAML
    pub definitions_path: String,
    /// 玩家名缓存 YAML
    pub player_cache_path: String,
    /// 语言文件目录
    pub lang_dir: String,
    /// 语言，如 `ja_jp`，对应 `{lang_dir}/{language}.json`
    pub language: String,
    /// 进度结果缓存秒数
    pub cache_seconds: u64,
    /// 玩家资料查询接口
    pub profile_api_url: String,
    /// 玩家资料查询超时秒数
    pub lookup_timeout_seconds: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            advancement_path: "./world/advancements".to_string(),
            definitions_path: "./config/advancementlist.yml".to_string(),
            player_cache_path: "./config/playercache.yml".to_string(),
            lang_dir: "./lang".to_string(),
            language: "ja_jp".to_string(),
            cache_seconds: 60,
            profile_api_url: "https://sessionserver.mojang.com/session/minecraft/profile"
                .to_string(),
            lookup_timeout_seconds: 10,
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源，`*` 表示全部
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://127.0.0.1:3000".to_string()],
            max_age_seconds: 24 * 60 * 60,
        }
    }
}

/// 进度背景图片
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BackgroundAsset {
    pub incomplete: String,
    pub completed: String,
}

/// 前端静态资源配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    /// 进度类型（task/goal/challenge）-> 背景图片
    pub background: HashMap<String, BackgroundAsset>,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
    pub collector: CollectorConfig,
    pub cors: CorsConfig,
    pub assets: AssetsConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（COLLECTOR_ 前缀，层级用 `__` 分隔，如
    ///    COLLECTOR_COLLECTOR__CACHE_SECONDS -> collector.cache_seconds）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("COLLECTOR_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("COLLECTOR")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
