//! 客户通知派发
//!
//! 订单状态更新后通过 mpsc 通道异步派发客户通知：
//!
//! ```text
//! api/orders (update) ──enqueue──► NotificationService ──mpsc──► NotifyWorker
//!                                                                    │
//!                                                              Dispatcher
//!                                                              ├─ email 渠道
//!                                                              ├─ whatsapp 渠道
//!                                                              └─ notification_log 落账
//! ```
//!
//! 派发是 best-effort：渠道失败只落账，绝不影响订单更新本身。

pub mod dispatcher;
pub mod messages;
pub mod service;
pub mod worker;

pub use dispatcher::Dispatcher;
pub use service::{NotificationService, NotifyRequest};
pub use worker::NotifyWorker;
