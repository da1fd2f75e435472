//! CSRF Token Handler

use axum::{Extension, Json, extract::State};

use crate::AppError;
use crate::auth::{CurrentAdmin, TokenStore};
use crate::core::ServerState;
use shared::client::CsrfTokenResponse;

/// Issue a one-time CSRF token bound to the caller's session.
///
/// 客户端在每个变更请求前取一个新令牌（令牌一次性消费）。
pub async fn issue(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<CsrfTokenResponse>, AppError> {
    let issued = state
        .csrf_tokens
        .issue(
            (),
            Some(admin.session_token.clone()),
            state.config.csrf_ttl(),
        )
        .map_err(|e| AppError::internal(format!("Failed to issue CSRF token: {e}")))?;

    Ok(Json(CsrfTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::db::DbService;

    #[tokio::test]
    async fn issued_token_is_bound_and_single_use() {
        let db = DbService::memory().await;
        let state = ServerState::with_db(Config::with_overrides("/tmp/backoffice-test", 0), db.db);

        let admin = CurrentAdmin {
            id: "admin:a".into(),
            username: "beheer".into(),
            display_name: "Beheerder".into(),
            session_token: "sessietoken".into(),
        };

        let response = issue(State(state.clone()), Extension(admin)).await.unwrap();
        let token = response.0.token;

        // Wrong session binding is rejected; right one consumes the token
        assert!(!state
            .csrf_tokens
            .validate(&token, Some("anderesessie"))
            .is_valid());
        assert!(state
            .csrf_tokens
            .validate(&token, Some("sessietoken"))
            .is_valid());
        assert!(!state
            .csrf_tokens
            .validate(&token, Some("sessietoken"))
            .is_valid());
    }
}
