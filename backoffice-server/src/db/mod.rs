//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB engine; in-memory engine in tests).

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "backoffice";
const DATABASE: &str = "orders";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB embedded)");

        Ok(Self { db })
    }

    /// In-memory database for tests
    #[cfg(test)]
    pub async fn memory() -> Self {
        use surrealdb::engine::local::Mem;

        let db = Surreal::new::<Mem>(())
            .await
            .expect("Failed to open in-memory database");
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .expect("Failed to select namespace");
        Self { db }
    }
}
