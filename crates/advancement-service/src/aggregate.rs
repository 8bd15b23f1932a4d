//! 进度汇总
//!
//! 已达成的进度计 1，未达成但有部分条件达成的计 done/total，其余计 0，
//! 总达成率同样截断到小数点后三位。进度数为 0 时达成率定义为 0.0。

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{AdvancementProgress, PlayerAdvancement};
use crate::reconcile::truncate_fraction;

/// 汇总全部进度
pub fn summarize(advancements: &HashMap<String, Arc<PlayerAdvancement>>) -> AdvancementProgress {
    let total = advancements.len() as u32;
    if total == 0 {
        return AdvancementProgress::default();
    }

    let mut done = 0u32;
    let mut progress = 0.0f64;
    for advancement in advancements.values() {
        if advancement.done {
            done += 1;
            progress += 1.0;
        } else if advancement.progress.done > 0 && advancement.progress.total > 0 {
            progress +=
                f64::from(advancement.progress.done) / f64::from(advancement.progress.total);
        }
    }

    AdvancementProgress {
        total,
        done,
        percentage: truncate_fraction(progress / f64::from(total)),
    }
}
