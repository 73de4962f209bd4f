//! Security Module
//!
//! - Authentication (bearer JWT)
//! - Security Middleware

pub mod auth;
pub mod middleware;

pub use auth::{Authenticator, Claims, Credentials, JwtAuth, JwtTokenGenerator};
pub use middleware::{RequestClaimsExt, auth_middleware, security_headers_middleware};
