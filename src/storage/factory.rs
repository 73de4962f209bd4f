//! 存储工厂模块
//!
//! 根据配置创建相应的存储实例。

use crate::config::config::{DatabaseConfig, DatabaseType};
#[cfg(not(feature = "surrealdb"))]
use crate::error::AppError;
use crate::error::Result;
use crate::storage::repository::Storage;
use tracing::info;

#[cfg(feature = "surrealdb")]
use crate::storage::surrealdb::SurrealStore;
#[cfg(feature = "surrealdb")]
use std::sync::Arc;

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例
    pub async fn create(config: &DatabaseConfig) -> Result<Storage> {
        info!(backend = %config.db_type, "creating storage");
        match config.db_type {
            DatabaseType::Memory => Ok(Storage::in_memory()),
            #[cfg(feature = "surrealdb")]
            DatabaseType::SurrealDB => {
                let store = SurrealStore::connect(config.clone()).await?;
                Ok(Storage::from_backend(Arc::new(store)))
            }
            #[cfg(not(feature = "surrealdb"))]
            DatabaseType::SurrealDB => Err(AppError::Config(
                "SurrealDB feature is not enabled. Enable 'surrealdb' feature to use SurrealDB."
                    .into(),
            )),
        }
    }
}
