//! Routes 模块
//!
//! 定义 API 路由。`create_public_*` 无需认证，其余路由由认证中间件保护。

pub mod appointment_routes;
pub mod catalog_routes;
pub mod journal_routes;
pub mod mood_routes;
pub mod quote_routes;
