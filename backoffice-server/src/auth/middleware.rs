//! 认证与 CSRF 中间件
//!
//! # 分层顺序
//!
//! 认证先行，CSRF 其次 — CSRF 绑定需要会话令牌。
//! 两类失败返回不同错误码（E3xxx vs CSRF_TOKEN_INVALID），
//! 客户端据此区分"重新登录"和"刷新 CSRF 令牌"。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentAdmin, TokenStore, Validation};
use crate::core::ServerState;
use crate::security_log;

/// CSRF token request header
pub const CSRF_HEADER: &str = "x-csrf-token";

/// 认证中间件 - 要求有效会话令牌
///
/// 从 `Authorization: Bearer <token>` 头提取会话令牌并在会话存储中验证。
/// 验证成功后将 [`CurrentAdmin`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login` (登录接口)
/// - `/api/health` (存活探测)
///
/// # 错误处理
///
/// | 错误 | 响应 |
/// |------|------|
/// | 无 Authorization 头 | 401 E3001 |
/// | 令牌未知/过期 | 401 E3002 (对外不区分) |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route = path == "/api/auth/login" || path == "/api/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(extract_bearer) {
        Some(token) => token.to_string(),
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.sessions.validate(&token, None) {
        Validation::Valid(session) => {
            let admin = CurrentAdmin::from_session(session, token);
            req.extensions_mut().insert(admin);
            Ok(next.run(req).await)
        }
        Validation::Invalid => {
            security_log!("WARN", "auth_failed", uri = format!("{:?}", req.uri()));
            Err(AppError::invalid_token())
        }
    }
}

/// CSRF 中间件 - 状态变更请求要求一次性令牌
///
/// POST/PUT/PATCH/DELETE 的 `/api/` 请求必须携带 `X-CSRF-Token` 头，
/// 令牌在 CSRF 存储中验证并消费，绑定必须匹配当前会话令牌。
/// 校验发生在任何业务逻辑之前。
///
/// # 豁免
///
/// - 读请求 (GET/HEAD/OPTIONS)
/// - `/api/auth/login` (登录前没有会话可绑定)
pub async fn require_csrf(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method();
    let is_mutation = method == http::Method::POST
        || method == http::Method::PUT
        || method == http::Method::PATCH
        || method == http::Method::DELETE;
    let path = req.uri().path();

    if !is_mutation || !path.starts_with("/api/") || path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    // 认证中间件已注入 CurrentAdmin；没有则说明分层配置错误
    let session_token = req
        .extensions()
        .get::<CurrentAdmin>()
        .map(|admin| admin.session_token.clone())
        .ok_or_else(AppError::unauthorized)?;

    let csrf_token = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let Some(csrf_token) = csrf_token else {
        security_log!("WARN", "csrf_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::csrf());
    };

    if !state
        .csrf_tokens
        .validate(&csrf_token, Some(&session_token))
        .is_valid()
    {
        security_log!("WARN", "csrf_rejected", uri = format!("{:?}", req.uri()));
        return Err(AppError::csrf());
    }

    Ok(next.run(req).await)
}

/// 从 Authorization 头提取令牌
pub fn extract_bearer(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer("Basic abc123"), None);
        assert_eq!(extract_bearer("bearer abc123"), None);
    }
}
