//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{NotificationLogEntry, Order, OrderCreate, OrderUpdate};
use crate::db::repository::{NotificationLogRepository, OrderRepository};
use crate::orders::OrderLifecycle;
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List all orders, newest first (paginated)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Get order by its human-facing reference
pub async fn get_by_bonnummer(
    State(state): State<ServerState>,
    Path(bonnummer): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_bonnummer(&bonnummer)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", bonnummer)))?;
    Ok(Json(order))
}

/// Create a new order (administrative entry)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;

    tracing::info!(bonnummer = %order.bonnummer, "Order created");
    Ok(Json(order))
}

/// Staff update: notes, contact preferences and/or status.
///
/// 载荷中出现 `status` 字段（值变不变都一样）→ 写入成功后入队客户通知。
/// 通知失败不影响本请求 — 落账在后台完成。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;

    let repo = OrderRepository::new(state.db.clone());
    let current = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    // 转换策略钩子（默认 Permissive：任何转换都放行）
    if let Some(requested) = payload.status {
        state
            .lifecycle
            .authorize(current.status, requested)
            .map_err(|e| AppError::business_rule(e.to_string()))?;
    }

    let should_notify = OrderLifecycle::should_notify(&payload);
    let updated = repo.update(&id, payload).await?;

    // 派发只在成功写入之后；入队即返回，不等待渠道结果
    if should_notify {
        state.notifications.enqueue(updated.clone()).await;
    }

    Ok(Json(updated))
}

/// Notification log for one order, newest first
pub async fn notifications(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<NotificationLogEntry>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    let order_id = order
        .id
        .ok_or_else(|| AppError::internal("Stored order has no id"))?;

    let logs = NotificationLogRepository::new(state.db.clone());
    let entries = logs.find_by_order(&order_id).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::db::DbService;
    use shared::{NotificationChannel, NotificationStatus, OrderStatus};
    use std::time::Duration;

    async fn test_state() -> ServerState {
        let db = DbService::memory().await;
        let config = Config::with_overrides("/tmp/backoffice-test", 0);
        ServerState::with_db(config, db.db)
    }

    fn create_payload(notify_email: Option<&str>) -> OrderCreate {
        serde_json::from_value(serde_json::json!({
            "customer_name": "J. de Vries",
            "amount": 249.95,
            "notify_by_email": notify_email.is_some(),
            "notification_email": notify_email,
        }))
        .unwrap()
    }

    /// Run updates against a state whose notify worker is live, with a
    /// recording log repo to observe dispatch side effects.
    struct UpdateHarness {
        state: ServerState,
        logs: NotificationLogRepository,
        tasks: crate::core::BackgroundTasks,
    }

    async fn update_harness() -> UpdateHarness {
        let state = test_state().await;
        let logs = NotificationLogRepository::new(state.db.clone());
        let mut tasks = crate::core::BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        UpdateHarness { state, logs, tasks }
    }

    async fn wait_for_entries(
        logs: &NotificationLogRepository,
        order_id: &surrealdb::RecordId,
        expected: usize,
    ) -> Vec<NotificationLogEntry> {
        for _ in 0..100 {
            let entries = logs.find_by_order(order_id).await.unwrap();
            if entries.len() >= expected {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        logs.find_by_order(order_id).await.unwrap()
    }

    #[tokio::test]
    async fn status_update_dispatches_notification() {
        let h = update_harness().await;
        let repo = OrderRepository::new(h.state.db.clone());
        let order = repo.create(create_payload(Some("a@b.com"))).await.unwrap();
        let id = order.id.as_ref().unwrap().to_string();

        let patch: OrderUpdate = serde_json::from_value(serde_json::json!({
            "status": "Bestelling in verwerking"
        }))
        .unwrap();
        let updated = update(State(h.state.clone()), Path(id), Json(patch))
            .await
            .unwrap();
        assert_eq!(updated.0.status, OrderStatus::Processing);

        let entries = wait_for_entries(&h.logs, order.id.as_ref().unwrap(), 1).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].channel, NotificationChannel::Email);
        // LoggingMailer 总是成功
        assert_eq!(entries[0].status, NotificationStatus::Sent);

        h.tasks.shutdown().await;
    }

    #[tokio::test]
    async fn note_only_update_does_not_dispatch() {
        let h = update_harness().await;
        let repo = OrderRepository::new(h.state.db.clone());
        let order = repo.create(create_payload(Some("a@b.com"))).await.unwrap();
        let id = order.id.as_ref().unwrap().to_string();

        let note_update: OrderUpdate = serde_json::from_value(serde_json::json!({
            "note_from_entrepreneur": "Stof is binnen"
        }))
        .unwrap();
        update(State(h.state.clone()), Path(id), Json(note_update))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;
        let entries = h.logs.find_by_order(order.id.as_ref().unwrap()).await.unwrap();
        assert!(entries.is_empty());

        h.tasks.shutdown().await;
    }

    #[tokio::test]
    async fn resubmitting_same_status_dispatches_again() {
        // 既有行为：载荷带 status 就触发，值不变也触发。
        let h = update_harness().await;
        let repo = OrderRepository::new(h.state.db.clone());
        let order = repo.create(create_payload(Some("a@b.com"))).await.unwrap();
        let id = order.id.as_ref().unwrap().to_string();

        let to_ready: OrderUpdate = serde_json::from_value(serde_json::json!({
            "status": "Bestelling is gereed"
        }))
        .unwrap();

        update(State(h.state.clone()), Path(id.clone()), Json(to_ready.clone()))
            .await
            .unwrap();
        let entries = wait_for_entries(&h.logs, order.id.as_ref().unwrap(), 1).await;
        assert_eq!(entries.len(), 1);

        // Same status again, still present in the payload
        update(State(h.state.clone()), Path(id), Json(to_ready))
            .await
            .unwrap();
        let entries = wait_for_entries(&h.logs, order.id.as_ref().unwrap(), 2).await;
        assert_eq!(entries.len(), 2);

        h.tasks.shutdown().await;
    }

    #[tokio::test]
    async fn update_of_missing_order_is_not_found_and_silent() {
        let h = update_harness().await;

        let to_ready: OrderUpdate = serde_json::from_value(serde_json::json!({
            "status": "Bestelling is gereed"
        }))
        .unwrap();
        let err = update(
            State(h.state.clone()),
            Path("order:bestaatniet".into()),
            Json(to_ready),
        )
        .await;
        assert!(matches!(err, Err(AppError::NotFound(_))));

        h.tasks.shutdown().await;
    }

    #[tokio::test]
    async fn create_validates_payload() {
        let state = test_state().await;
        let bad: OrderCreate = serde_json::from_value(serde_json::json!({
            "customer_name": "",
            "amount": 10.0,
        }))
        .unwrap();

        let err = create(State(state), Json(bad)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }
}
