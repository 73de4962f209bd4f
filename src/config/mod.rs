//! 配置管理模块
//!
//! 默认值、`config.yaml` 与 `WELLBEING_` 前缀的环境变量依次合并（figment）。

pub mod config;
pub mod loader;
