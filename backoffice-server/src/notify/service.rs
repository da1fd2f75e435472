//! 通知服务
//!
//! `NotificationService` 是生命周期与派发器之间的解耦点：
//! 订单更新处理器只负责入队（状态变更事件），后台 worker 消费并派发。
//! 订单更新在入队前已回复成功 — 通知结果不影响请求结果。

use crate::db::models::Order;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One dispatch request: the order as written, already carrying its new status
pub struct NotifyRequest {
    pub order: Order,
}

/// Notification dispatch entry point held in server state
pub struct NotificationService {
    tx: mpsc::Sender<NotifyRequest>,
    rx: Mutex<Option<mpsc::Receiver<NotifyRequest>>>,
}

impl NotificationService {
    pub fn new(buffer_size: usize) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(buffer_size);
        Arc::new(Self {
            tx,
            rx: Mutex::new(Some(rx)),
        })
    }

    /// 由后台 worker 启动时取走接收端；只能取一次
    pub fn take_receiver(&self) -> Option<mpsc::Receiver<NotifyRequest>> {
        self.rx.lock().ok()?.take()
    }

    /// Enqueue a dispatch request (best-effort).
    ///
    /// 通道已关闭时丢弃并记录 — 通知不参与订单事务。
    pub async fn enqueue(&self, order: Order) {
        if self.tx.send(NotifyRequest { order }).await.is_err() {
            tracing::error!("Notification channel closed — notification dropped");
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_can_only_be_taken_once() {
        let service = NotificationService::new(8);
        assert!(service.take_receiver().is_some());
        assert!(service.take_receiver().is_none());
    }
}
