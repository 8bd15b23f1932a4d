//! Minecraft 进度收集服务
//!
//! 读取服务器存档中的玩家进度，结合进度定义和语言文件转换为展示用数据，
//! 计算达成率，按可见性条件过滤后通过 REST API 提供。
//!
//! ## 核心功能
//!
//! - **进度转换**：按进度定义对齐玩家存档，计算每条进度的条件达成情况
//! - **进度汇总**：计算玩家的总体达成率
//! - **可见性过滤**：全部 / 仅已达成 / 按父进度逐步解锁
//! - **结果缓存**：按玩家缓存计算结果，TTL 内不重新读取存档
//! - **玩家目录**：UUID 到玩家名的解析与持久化
//!
//! ## 模块结构
//!
//! - `models`: 进度定义、原始进度、转换后进度等数据模型
//! - `registry` / `lang`: 进度定义注册表和语言文件
//! - `snapshot`: 玩家存档读取
//! - `reconcile` / `aggregate` / `filter`: 转换、汇总、过滤
//! - `cache`: 结果缓存
//! - `directory`: 玩家目录
//! - `collector`: 组合以上组件的服务入口
//! - `dto` / `handlers` / `routes` / `state`: HTTP 接口
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 并发：tokio JoinSet、DashMap
//! - 序列化：serde (JSON / YAML)

pub mod aggregate;
pub mod cache;
pub mod collector;
pub mod directory;
pub mod dto;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod lang;
pub mod models;
pub mod reconcile;
pub mod registry;
pub mod routes;
pub mod snapshot;
pub mod state;

pub use collector::AdvancementCollector;
pub use error::{CollectorError, Result};
