//! Wellbeing - 个人身心健康记录服务
//!
//! 记录心情与日记、预约心理咨询师，并按日期提供固定不变的每日名言。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
