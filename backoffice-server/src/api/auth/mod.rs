//! Authentication API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/login | POST | 登录，签发会话令牌 | 无 |
//! | /api/auth/me | GET | 当前管理员信息 | 需要 |
//! | /api/auth/logout | POST | 撤销会话令牌 | 需要 |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Authentication router
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public route - no auth middleware applied
        .route("/api/auth/login", post(handler::login))
        // Protected routes - require authentication
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
