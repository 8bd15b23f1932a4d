//! 玩家目录
//!
//! 存档目录中的玩家 UUID 到玩家名的解析与持久化。

mod lookup;
mod resolver;
mod store;

pub use lookup::{IdentityLookup, LookupError, MojangProfileClient};
pub use resolver::PlayerDirectory;
pub use store::{DirectoryStore, DirectoryStoreError, YamlDirectoryStore};
