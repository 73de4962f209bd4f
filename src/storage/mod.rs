//! 存储层模块
//!
//! 提供数据持久化服务，支持进程内存储和 SurrealDB。

pub mod factory;
pub mod memory;
pub mod repository;

#[cfg(feature = "surrealdb")]
pub mod surrealdb;

pub use factory::StorageFactory;
pub use repository::{InsertOutcome, Storage};

use chrono::{DateTime, Utc};

/// 按 `created_at` 倒序排列后截断
pub(crate) fn newest_first<T>(
    mut rows: Vec<T>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<T> {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}
