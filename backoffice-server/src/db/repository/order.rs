//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// 生成 bonnummer 时的最大重试次数（同日随机后缀碰撞）
const MAX_BONNUMMER_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first (paginated)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit.max(0)))
            .bind(("offset", offset.max(0)))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<Order> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find order by its human-facing reference
    pub async fn find_by_bonnummer(&self, bonnummer: &str) -> RepoResult<Option<Order>> {
        let bonnummer_owned = bonnummer.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE bonnummer = $bonnummer LIMIT 1")
            .bind(("bonnummer", bonnummer_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Create a new order
    ///
    /// 未提供 bonnummer 时由服务端生成；提供的 bonnummer 重复时拒绝
    /// （bonnummer 全局唯一，分配后不可变）。
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        // Explicit bonnummer: reject duplicates loudly
        if let Some(ref bon) = data.bonnummer
            && self.find_by_bonnummer(bon).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Order with bonnummer '{}' already exists",
                bon
            )));
        }

        let bonnummer = match data.bonnummer.clone() {
            Some(bon) => bon,
            None => self.allocate_bonnummer().await?,
        };

        let now = shared::util::now_millis();
        let order = Order {
            id: None,
            bonnummer,
            customer_name: data.customer_name,
            email: data.email.unwrap_or_default(),
            phone: data.phone.unwrap_or_default(),
            street: data.street.unwrap_or_default(),
            postcode: data.postcode.unwrap_or_default(),
            city: data.city.unwrap_or_default(),
            amount: data.amount,
            status: data.status.unwrap_or_default(),
            product_type: data.product_type.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            product_details: data.product_details.unwrap_or_default(),
            client_note: data.client_note.unwrap_or_default(),
            note_from_entrepreneur: String::new(),
            notify_by_email: data.notify_by_email,
            notify_by_whatsapp: data.notify_by_whatsapp,
            notification_email: data.notification_email.unwrap_or_default(),
            notification_phone: data.notification_phone.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update an order (staff field edits and/or status change)
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let pure_id = strip_table_prefix(TABLE, id);
        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        #[derive(Serialize)]
        struct UpdateDoc {
            #[serde(flatten)]
            patch: OrderUpdate,
            updated_at: i64,
        }

        let record = RecordId::from_table_key(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record))
            .bind((
                "data",
                UpdateDoc {
                    patch: data,
                    updated_at: shared::util::now_millis(),
                },
            ))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Generate a bonnummer that is free in the current table
    async fn allocate_bonnummer(&self) -> RepoResult<String> {
        for _ in 0..MAX_BONNUMMER_ATTEMPTS {
            let candidate = shared::util::generate_bonnummer();
            if self.find_by_bonnummer(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(RepoError::Database(
            "Could not allocate a unique bonnummer".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;
    use shared::OrderStatus;

    fn minimal_create(name: &str) -> OrderCreate {
        serde_json::from_value(serde_json::json!({
            "customer_name": name,
            "amount": 125.50,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch_roundtrip() {
        let db = DbService::memory().await;
        let repo = OrderRepository::new(db.db.clone());

        let created = repo.create(minimal_create("J. de Vries")).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.status, OrderStatus::Pending);
        assert!(created.bonnummer.starts_with('B'));
        assert_eq!(created.amount, Decimal::new(12550, 2));

        let id = created.id.as_ref().unwrap().to_string();
        let fetched = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.bonnummer, created.bonnummer);

        let by_bon = repo
            .find_by_bonnummer(&created.bonnummer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_bon.customer_name, "J. de Vries");
    }

    #[tokio::test]
    async fn duplicate_bonnummer_is_rejected() {
        let db = DbService::memory().await;
        let repo = OrderRepository::new(db.db.clone());

        let mut create = minimal_create("A");
        create.bonnummer = Some("B260101-0001".into());
        repo.create(create.clone()).await.unwrap();

        create.customer_name = "B".into();
        let err = repo.create(create).await;
        assert!(matches!(err, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn update_merges_fields_and_keeps_bonnummer() {
        let db = DbService::memory().await;
        let repo = OrderRepository::new(db.db.clone());

        let created = repo.create(minimal_create("C. Jansen")).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let update = OrderUpdate {
            status: Some(OrderStatus::Processing),
            note_from_entrepreneur: Some("Stof besteld".into()),
            ..Default::default()
        };
        let updated = repo.update(&id, update).await.unwrap();

        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.note_from_entrepreneur, "Stof besteld");
        assert_eq!(updated.bonnummer, created.bonnummer);
        assert_eq!(updated.customer_name, "C. Jansen");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn list_is_paginated_newest_first() {
        let db = DbService::memory().await;
        let repo = OrderRepository::new(db.db.clone());

        for i in 0..3 {
            repo.create(minimal_create(&format!("Klant {i}"))).await.unwrap();
            // created_at has millisecond resolution
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let page = repo.find_all(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].customer_name, "Klant 2");

        let rest = repo.find_all(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].customer_name, "Klant 0");
    }

    #[tokio::test]
    async fn update_missing_order_is_not_found() {
        let db = DbService::memory().await;
        let repo = OrderRepository::new(db.db.clone());

        let err = repo.update("order:bestaatniet", OrderUpdate::default()).await;
        assert!(matches!(err, Err(RepoError::NotFound(_))));
    }
}
