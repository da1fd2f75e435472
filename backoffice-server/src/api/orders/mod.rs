//! Order API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET | 分页列表（新→旧） |
//! | /api/orders | POST | 创建订单 |
//! | /api/orders/{id} | GET | 按 id 查询 |
//! | /api/orders/{id} | PATCH | 员工更新（状态/备注/偏好） |
//! | /api/orders/bonnummer/{bonnummer} | GET | 按单号查询 |
//! | /api/orders/{id}/notifications | GET | 该订单的通知流水 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/bonnummer/{bonnummer}", get(handler::get_by_bonnummer))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
        .route("/{id}/notifications", get(handler::notifications))
}
