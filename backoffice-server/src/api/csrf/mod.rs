//! CSRF API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/csrf | GET | 签发一次性 CSRF 令牌（绑定当前会话） | 需要 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// CSRF issuance router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/csrf", get(handler::issue))
}
