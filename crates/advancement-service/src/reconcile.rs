//! 进度转换
//!
//! 以注册表为准逐条转换：注册表中的每个 key 都会产出一条进度（存档中没有时视为未开始），
//! 存档中有而注册表没有的 key 被忽略。
//!
//! ## 进度计算
//!
//! - 分母：oneof 为 1，allof 为条件数
//! - 已达成（done）：分子等于分母，达成率 1.0
//! - 未达成：分子为有达成时间的条件数，达成率截断（非四舍五入）到小数点后三位
//!
//! 单条进度的条件时间格式错误只丢弃该条进度，不影响整个请求。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use advancement_shared::observability::metrics;

use crate::lang::LanguageMapping;
use crate::models::{
    AdvancementDisplay, AdvancementProgress, DisplayIcon, PlayerAdvancement, RawAdvancement,
};
use crate::registry::DefinitionRegistry;

/// 存档中条件达成时间的格式，如 `2023-01-02 03:04:05 +0900`
pub const ADVANCEMENT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z";

/// 达成时间的固定宽度形状：`d` 为数字，`s` 为时区符号
const ADVANCEMENT_TIME_SHAPE: &[u8] = b"dddd-dd-dd dd:dd:dd sdddd";

/// 物品栏精灵图每行的格数，同时也是每格的像素边长
pub const SPRITE_SIZE: i32 = 32;

/// 单条进度转换错误
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("advancement key not found: {0}")]
    UnknownKey(String),

    #[error("failed to convert advancement {key}: criterion {criterion} has invalid time {value:?}")]
    InvalidTimestamp {
        key: String,
        criterion: String,
        value: String,
        /// 形状不符（未补零、时区带冒号等）时为 None
        #[source]
        source: Option<chrono::ParseError>,
    },
}

/// 将比例截断到小数点后三位
pub fn truncate_fraction(value: f64) -> f64 {
    (value * 1000.0).floor() / 1000.0
}

/// 按固定格式解析达成时间
///
/// chrono 的 `%m`、`%z` 等会接受未补零的字段和 `+09:00`，先按固定宽度校验形状
pub fn parse_advancement_time(
    value: &str,
) -> Result<DateTime<FixedOffset>, Option<chrono::ParseError>> {
    let shaped = value.len() == ADVANCEMENT_TIME_SHAPE.len()
        && value
            .bytes()
            .zip(ADVANCEMENT_TIME_SHAPE)
            .all(|(b, &shape)| match shape {
                b'd' => b.is_ascii_digit(),
                b's' => b == b'+' || b == b'-',
                literal => b == literal,
            });
    if !shaped {
        return Err(None);
    }
    DateTime::parse_from_str(value, ADVANCEMENT_TIME_LAYOUT).map_err(Some)
}

/// 精灵图坐标（位置从 1 开始，小于 1 按 1 处理）
pub fn sprite_offset(pos: i32) -> (i32, i32) {
    let p = pos.saturating_sub(1).max(0);
    ((p % SPRITE_SIZE) * SPRITE_SIZE, (p / SPRITE_SIZE) * SPRITE_SIZE)
}

/// 进度转换器
///
/// 持有只读的注册表与语言映射，克隆成本低，可在并发任务间共享
#[derive(Debug, Clone)]
pub struct Reconciler {
    registry: Arc<DefinitionRegistry>,
    lang: Arc<LanguageMapping>,
}

impl Reconciler {
    pub fn new(registry: Arc<DefinitionRegistry>, lang: Arc<LanguageMapping>) -> Self {
        Self { registry, lang }
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// 转换单条进度
    pub fn convert(
        &self,
        key: &str,
        raw: &RawAdvancement,
    ) -> Result<PlayerAdvancement, ConversionError> {
        let definition = self
            .registry
            .get(key)
            .ok_or_else(|| ConversionError::UnknownKey(key.to_string()))?;

        let mut criteria = BTreeMap::new();
        for name in &definition.criteria {
            let achieved_at = match raw.criteria.get(name) {
                Some(value) => Some(parse_advancement_time(value).map_err(|source| {
                    ConversionError::InvalidTimestamp {
                        key: key.to_string(),
                        criterion: name.clone(),
                        value: value.clone(),
                        source,
                    }
                })?),
                None => None,
            };
            criteria.insert(name.clone(), achieved_at);
        }

        let total = definition.calculate.required(definition.criteria.len());
        let progress = if raw.done {
            AdvancementProgress {
                total,
                done: total,
                percentage: 1.0,
            }
        } else {
            let met = criteria.values().filter(|t| t.is_some()).count() as u32;
            let percentage = if met > 0 {
                truncate_fraction(f64::from(met) / f64::from(total))
            } else {
                0.0
            };
            AdvancementProgress {
                total,
                done: met,
                percentage,
            }
        };

        let icon = &definition.icon;
        let (posx, posy) = if icon.invsprite {
            let (x, y) = sprite_offset(icon.pos);
            (Some(x), Some(y))
        } else {
            (None, None)
        };

        Ok(PlayerAdvancement {
            key: key.to_string(),
            parent: definition.parent.clone(),
            display: AdvancementDisplay {
                title: self.lang.title(&definition.language_key),
                description: self.lang.description(&definition.language_key),
                icon: DisplayIcon {
                    url: icon.url.clone(),
                    invsprite: icon.invsprite,
                    posx,
                    posy,
                },
            },
            advancement_type: definition.advancement_type,
            hidden: definition.hidden,
            done: raw.done,
            criteria,
            progress,
        })
    }

    /// 并发转换注册表中的全部进度
    ///
    /// 每个 key 一个任务，结果通过 JoinSet 汇总到调用方，无需共享锁。
    pub async fn reconcile(
        &self,
        raw: HashMap<String, RawAdvancement>,
    ) -> HashMap<String, Arc<PlayerAdvancement>> {
        let raw = Arc::new(raw);
        let mut tasks = JoinSet::new();

        for key in self.registry.keys() {
            let key = key.clone();
            let raw = Arc::clone(&raw);
            let reconciler = self.clone();

            tasks.spawn(async move {
                let untouched = RawAdvancement::default();
                let state = raw.get(&key).unwrap_or(&untouched);
                let converted = reconciler.convert(&key, state);
                (key, converted)
            });
        }

        let mut advancements = HashMap::with_capacity(self.registry.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, Ok(advancement))) => {
                    advancements.insert(key, Arc::new(advancement));
                }
                Ok((key, Err(e))) => {
                    metrics::record_conversion_failure();
                    warn!(key = %key, error = %e, "进度转换失败，已跳过");
                }
                Err(e) => {
                    warn!(error = %e, "进度转换任务异常退出");
                }
            }
        }

        debug!(count = advancements.len(), "进度转换完成");
        advancements
    }
}
