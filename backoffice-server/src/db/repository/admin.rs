//! Administrator Account Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AdminAccount, AdminCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find admin by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminAccount>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let admins: Vec<AdminAccount> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Create a new admin account
    pub async fn create(&self, data: AdminCreate) -> RepoResult<AdminAccount> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Admin '{}' already exists",
                data.username
            )));
        }

        let hash_pass = AdminAccount::hash_password(&data.password)
            .map_err(|e| RepoError::Validation(format!("Password hashing failed: {e}")))?;

        let admin = AdminAccount {
            id: None,
            display_name: data.display_name.unwrap_or_else(|| data.username.clone()),
            username: data.username,
            hash_pass,
            is_active: true,
        };

        let created: Option<AdminAccount> = self.base.db().create(TABLE).content(admin).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }

    /// Seed the default administrator account if it does not exist yet
    ///
    /// 首次启动时调用；已存在则不动（不会重置密码）。
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> RepoResult<()> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        self.create(AdminCreate {
            username: username.to_string(),
            password: password.to_string(),
            display_name: Some("Beheerder".to_string()),
        })
        .await?;

        tracing::info!(username = %username, "Default admin account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn create_find_and_verify() {
        let db = DbService::memory().await;
        let repo = AdminRepository::new(db.db.clone());

        repo.create(AdminCreate {
            username: "beheer".into(),
            password: "geheim-wachtwoord".into(),
            display_name: None,
        })
        .await
        .unwrap();

        let admin = repo.find_by_username("beheer").await.unwrap().unwrap();
        assert_eq!(admin.display_name, "beheer");
        assert!(admin.verify_password("geheim-wachtwoord").unwrap());
        assert!(!admin.verify_password("verkeerd").unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let db = DbService::memory().await;
        let repo = AdminRepository::new(db.db.clone());

        let create = AdminCreate {
            username: "beheer".into(),
            password: "a".into(),
            display_name: None,
        };
        repo.create(create.clone()).await.unwrap();
        assert!(matches!(
            repo.create(create).await,
            Err(RepoError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn ensure_default_admin_is_idempotent() {
        let db = DbService::memory().await;
        let repo = AdminRepository::new(db.db.clone());

        repo.ensure_default_admin("beheer", "wachtwoord").await.unwrap();
        repo.ensure_default_admin("beheer", "ander-wachtwoord").await.unwrap();

        // Original password still valid — seeding never resets credentials
        let admin = repo.find_by_username("beheer").await.unwrap().unwrap();
        assert!(admin.verify_password("wachtwoord").unwrap());
    }
}
