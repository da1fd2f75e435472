//! Authentication Handlers
//!
//! Handles login, logout and session introspection.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::AppError;
use crate::auth::{AdminSession, CurrentAdmin, TokenStore};
use crate::core::ServerState;
use crate::db::repository::AdminRepository;
use crate::security_log;

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates admin credentials and issues an opaque session token.
/// 令牌只存在于内存会话存储 — 进程重启即失效。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = AdminRepository::new(state.db.clone());
    let username = req.username.clone();

    let admin = repo
        .find_by_username(&username)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let admin = match admin {
        Some(account) => {
            if !account.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = account
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                security_log!("WARN", "login_failed", username = username.clone());
                return Err(AppError::invalid_credentials());
            }

            account
        }
        None => {
            security_log!("WARN", "login_failed", username = username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let admin_id = admin
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let session = AdminSession {
        admin_id: admin_id.clone(),
        username: admin.username.clone(),
        display_name: admin.display_name.clone(),
    };

    let issued = state
        .sessions
        .issue(session, None, state.config.session_ttl())
        .map_err(|e| AppError::internal(format!("Failed to issue session token: {e}")))?;

    security_log!("INFO", "login_success", username = admin.username.clone());
    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        user: UserInfo {
            id: admin_id,
            username: admin.username,
            display_name: admin.display_name,
        },
    }))
}

/// Current admin info
pub async fn me(Extension(admin): Extension<CurrentAdmin>) -> Json<UserInfo> {
    Json(UserInfo {
        id: admin.id,
        username: admin.username,
        display_name: admin.display_name,
    })
}

/// Logout handler — revokes the presented session token
pub async fn logout(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Json<serde_json::Value> {
    state.sessions.revoke(&admin.session_token);
    security_log!("INFO", "logout", username = admin.username.clone());
    Json(serde_json::json!({ "message": "Logged out" }))
}
