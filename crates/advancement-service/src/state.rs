//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use crate::collector::AdvancementCollector;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<AdvancementCollector>,
}

impl AppState {
    pub fn new(collector: Arc<AdvancementCollector>) -> Self {
        Self { collector }
    }
}
