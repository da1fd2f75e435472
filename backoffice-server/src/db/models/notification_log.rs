//! Notification Log Model
//!
//! 仅追加：每次派发尝试恰好一条记录（失败的尝试也入账），
//! 写入后不再变更或删除。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{NotificationChannel, NotificationStatus};
use surrealdb::RecordId;

/// Notification log ID type
pub type NotificationLogId = RecordId;

/// One dispatch attempt, recorded after the attempt completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLogEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<NotificationLogId>,
    /// Reference to the order (not ownership — the order outlives the log)
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    pub channel: NotificationChannel,
    pub status: NotificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Unix 毫秒时间戳
    pub created_at: i64,
}
