//! 进度可见性过滤
//!
//! 过滤只生成新的结果集，不修改输入；汇总、更新时间、缓存时间沿用完整结果集的值。
//!
//! Progressive 规则：
//! - 已达成的进度总是可见
//! - 隐藏且未达成的进度不可见
//! - 父进度已达成，或父进度的父进度已达成时可见（只向上看两层）

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{PlayerAdvancement, PlayerRecordSet, VisibilityPolicy};

/// 按可见性条件过滤结果集
pub fn filter(policy: VisibilityPolicy, summary: &PlayerRecordSet) -> PlayerRecordSet {
    let advancements: HashMap<String, Arc<PlayerAdvancement>> = summary
        .advancements
        .iter()
        .filter(|(_, advancement)| is_visible(policy, summary, advancement))
        .map(|(key, advancement)| (key.clone(), Arc::clone(advancement)))
        .collect();

    PlayerRecordSet {
        advancements,
        progress: summary.progress,
        updated: summary.updated,
        cached: summary.cached,
    }
}

fn is_visible(
    policy: VisibilityPolicy,
    summary: &PlayerRecordSet,
    advancement: &PlayerAdvancement,
) -> bool {
    match policy {
        VisibilityPolicy::All => true,
        VisibilityPolicy::CompletedOnly => advancement.done,
        VisibilityPolicy::Progressive => {
            if advancement.done {
                return true;
            }
            if advancement.hidden {
                return false;
            }
            if summary.is_parent_done(advancement) {
                return true;
            }
            summary
                .parent_of(advancement)
                .is_some_and(|parent| summary.is_parent_done(parent))
        }
    }
}
