//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod appointment_handler;
pub mod catalog_handler;
pub mod journal_handler;
pub mod mood_handler;
pub mod quote_handler;

pub use appointment_handler::*;
pub use catalog_handler::*;
pub use journal_handler::*;
pub use mood_handler::*;
pub use quote_handler::*;
