//! HTTP 请求处理器

pub mod advancement;
pub mod health;
pub mod player;
