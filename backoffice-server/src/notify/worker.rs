//! 通知后台 Worker
//!
//! 从 mpsc 通道消费派发请求，逐条运行 Dispatcher。
//! 通道关闭时自动退出。

use super::dispatcher::Dispatcher;
use super::service::NotifyRequest;

/// Notification dispatch worker
pub struct NotifyWorker {
    dispatcher: Dispatcher,
}

impl NotifyWorker {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<NotifyRequest>) {
        tracing::info!("Notification worker started");

        while let Some(req) = rx.recv().await {
            let attempts = self.dispatcher.dispatch(&req.order).await;
            tracing::debug!(
                bonnummer = %req.order.bonnummer,
                status = %req.order.status,
                attempts,
                "Notification dispatch handled"
            );
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::Order;
    use crate::db::repository::NotificationLogRepository;
    use crate::notify::NotificationService;
    use async_trait::async_trait;
    use notify_transport::{EmailTransport, LoggingMessenger, TransportResult};
    use rust_decimal::Decimal;
    use shared::{NotificationChannel, NotificationStatus, OrderStatus};
    use std::sync::Arc;
    use std::time::Duration;
    use surrealdb::RecordId;

    struct OkMailer;

    #[async_trait]
    impl EmailTransport for OkMailer {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> TransportResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn enqueued_order_ends_up_in_the_log() {
        let db = DbService::memory().await;
        let logs = NotificationLogRepository::new(db.db.clone());
        let dispatcher = Dispatcher::new(
            Arc::new(OkMailer),
            Arc::new(LoggingMessenger),
            logs.clone(),
            Duration::from_millis(200),
        );

        let service = NotificationService::new(8);
        let rx = service.take_receiver().unwrap();
        let worker = tokio::spawn(NotifyWorker::new(dispatcher).run(rx));

        let order_id = RecordId::from_table_key("order", "workertest");
        let order = Order {
            id: Some(order_id.clone()),
            bonnummer: "B260807-0001".into(),
            customer_name: "K. Bakker".into(),
            email: String::new(),
            phone: String::new(),
            street: String::new(),
            postcode: String::new(),
            city: String::new(),
            amount: Decimal::new(9900, 2),
            status: OrderStatus::Processing,
            product_type: String::new(),
            description: String::new(),
            product_details: String::new(),
            client_note: String::new(),
            note_from_entrepreneur: String::new(),
            notify_by_email: true,
            notify_by_whatsapp: false,
            notification_email: "a@b.com".into(),
            notification_phone: String::new(),
            created_at: 0,
            updated_at: 0,
        };
        service.enqueue(order).await;

        // Worker 异步消费 — 轮询直到落账
        let mut entries = Vec::new();
        for _ in 0..50 {
            entries = logs.find_by_order(&order_id).await.unwrap();
            if !entries.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].channel, NotificationChannel::Email);
        assert_eq!(entries[0].status, NotificationStatus::Sent);

        drop(service);
        worker.await.unwrap();
    }
}
