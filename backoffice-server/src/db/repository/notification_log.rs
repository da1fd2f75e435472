//! Notification Log Repository
//!
//! 仅追加 — 没有 update/delete 操作，按设计不提供。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::NotificationLogEntry;
use shared::{NotificationChannel, NotificationStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "notification_log";

#[derive(Clone)]
pub struct NotificationLogRepository {
    base: BaseRepository,
}

impl NotificationLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record one dispatch attempt (success or failure)
    pub async fn append(
        &self,
        order_id: RecordId,
        channel: NotificationChannel,
        status: NotificationStatus,
        recipient_email: Option<String>,
        recipient_phone: Option<String>,
        error_message: Option<String>,
    ) -> RepoResult<NotificationLogEntry> {
        let entry = NotificationLogEntry {
            id: None,
            order_id,
            channel,
            status,
            recipient_email,
            recipient_phone,
            error_message,
            created_at: shared::util::now_millis(),
        };

        let created: Option<NotificationLogEntry> =
            self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to write notification log".to_string()))
    }

    /// All attempts for one order, newest first
    pub async fn find_by_order(&self, order_id: &RecordId) -> RepoResult<Vec<NotificationLogEntry>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM notification_log WHERE order_id = $order ORDER BY created_at DESC",
            )
            .bind(("order", order_id.to_string()))
            .await?;
        let entries: Vec<NotificationLogEntry> = result.take(0)?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn append_and_query_by_order() {
        let db = DbService::memory().await;
        let repo = NotificationLogRepository::new(db.db.clone());

        let order_a = RecordId::from_table_key("order", "a");
        let order_b = RecordId::from_table_key("order", "b");

        repo.append(
            order_a.clone(),
            NotificationChannel::Email,
            NotificationStatus::Sent,
            Some("klant@example.nl".into()),
            None,
            None,
        )
        .await
        .unwrap();

        repo.append(
            order_a.clone(),
            NotificationChannel::Whatsapp,
            NotificationStatus::Failed,
            None,
            Some("+31612345678".into()),
            Some("provider unreachable".into()),
        )
        .await
        .unwrap();

        repo.append(
            order_b.clone(),
            NotificationChannel::Email,
            NotificationStatus::Sent,
            Some("ander@example.nl".into()),
            None,
            None,
        )
        .await
        .unwrap();

        let entries = repo.find_by_order(&order_a).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.status == NotificationStatus::Failed
            && e.error_message.as_deref() == Some("provider unreachable")));

        let entries_b = repo.find_by_order(&order_b).await.unwrap();
        assert_eq!(entries_b.len(), 1);
    }
}
