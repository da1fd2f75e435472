//! Administrator Account Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Admin ID type
pub type AdminId = RecordId;

/// Administrator account matching the SurrealDB `admin` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<AdminId>,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl AdminAccount {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = AdminAccount::hash_password("wachtwoord123").unwrap();
        let admin = AdminAccount {
            id: None,
            username: "beheer".into(),
            display_name: "Beheerder".into(),
            hash_pass: hash,
            is_active: true,
        };

        assert!(admin.verify_password("wachtwoord123").unwrap());
        assert!(!admin.verify_password("fout-wachtwoord").unwrap());
    }
}
