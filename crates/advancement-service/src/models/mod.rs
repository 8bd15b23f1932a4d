//! 数据模型

mod advancement;
mod definition;
mod enums;

pub use advancement::*;
pub use definition::*;
pub use enums::*;
