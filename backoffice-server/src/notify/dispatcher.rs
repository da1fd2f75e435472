//! 通知派发器
//!
//! 给定订单（已处于新状态），对每个启用的渠道发送一次状态文案。
//! 渠道相互独立：一个失败不影响另一个。每次尝试 — 成功或失败 —
//! 恰好落一条 notification_log 记录，写在尝试完成之后。
//!
//! 渠道错误在此处终结：落账后吞掉，绝不向上传播。
//! 订单更新在派发之前就已经回复成功。

use crate::db::models::Order;
use crate::db::repository::NotificationLogRepository;
use crate::notify::messages;
use notify_transport::{EmailTransport, MessageTransport, TransportResult};
use shared::{NotificationChannel, NotificationStatus};
use std::sync::Arc;
use std::time::Duration;
use surrealdb::RecordId;

/// Notification dispatcher
#[derive(Clone)]
pub struct Dispatcher {
    email: Arc<dyn EmailTransport>,
    messenger: Arc<dyn MessageTransport>,
    logs: NotificationLogRepository,
    /// 单渠道发送超时；超时按失败落账（挂死的传输不能拖死 worker）
    send_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        email: Arc<dyn EmailTransport>,
        messenger: Arc<dyn MessageTransport>,
        logs: NotificationLogRepository,
        send_timeout: Duration,
    ) -> Self {
        Self {
            email,
            messenger,
            logs,
            send_timeout,
        }
    }

    /// Fan out the status message over every enabled channel.
    ///
    /// Returns the number of attempts made (0, 1 or 2).
    pub async fn dispatch(&self, order: &Order) -> usize {
        let Some(order_id) = order.id.clone() else {
            tracing::warn!(bonnummer = %order.bonnummer, "Dispatch skipped: order has no id");
            return 0;
        };

        let message = messages::status_message(order.status);
        let mut attempts = 0;

        // 渠道开关 + 非空联系字段，两者都满足才尝试
        if order.notify_by_email && !order.notification_email.is_empty() {
            attempts += 1;
            let subject = messages::email_subject(&order.bonnummer);
            let body = messages::email_body(order, message);
            let outcome = self
                .attempt(self.email.send(&order.notification_email, &subject, &body))
                .await;
            self.record(
                &order_id,
                NotificationChannel::Email,
                Some(order.notification_email.clone()),
                None,
                outcome,
            )
            .await;
        }

        if order.notify_by_whatsapp && !order.notification_phone.is_empty() {
            attempts += 1;
            let text = messages::whatsapp_text(order, message);
            let outcome = self
                .attempt(self.messenger.send(&order.notification_phone, &text))
                .await;
            self.record(
                &order_id,
                NotificationChannel::Whatsapp,
                None,
                Some(order.notification_phone.clone()),
                outcome,
            )
            .await;
        }

        attempts
    }

    /// Run one channel send under the configured timeout.
    async fn attempt(
        &self,
        send: impl Future<Output = TransportResult<()>>,
    ) -> Result<(), String> {
        match tokio::time::timeout(self.send_timeout, send).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "Send timed out after {}ms",
                self.send_timeout.as_millis()
            )),
        }
    }

    /// Write the log entry for a completed attempt.
    ///
    /// 落账失败只记日志 — 通知流水不参与订单事务。
    async fn record(
        &self,
        order_id: &RecordId,
        channel: NotificationChannel,
        recipient_email: Option<String>,
        recipient_phone: Option<String>,
        outcome: Result<(), String>,
    ) {
        let (status, error_message) = match outcome {
            Ok(()) => (NotificationStatus::Sent, None),
            Err(reason) => {
                tracing::warn!(
                    order = %order_id,
                    channel = %channel,
                    error = %reason,
                    "Notification channel send failed"
                );
                (NotificationStatus::Failed, Some(reason))
            }
        };

        if let Err(e) = self
            .logs
            .append(
                order_id.clone(),
                channel,
                status,
                recipient_email,
                recipient_phone,
                error_message,
            )
            .await
        {
            tracing::error!(order = %order_id, channel = %channel, error = %e, "Failed to write notification log entry");
        }
    }
}
