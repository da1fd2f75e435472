//! 认证与 CSRF
//!
//! 不透明会话令牌（易失内存存储）+ 一次性 CSRF 令牌。
//! 中间件见 [`middleware`]，存储抽象见 [`token_store`]。

pub mod middleware;
pub mod token_store;

pub use token_store::{
    IssuedToken, MemoryTokenStore, TokenStore, TokenStoreError, Validation,
};

/// 会话负载 — 登录时写入会话存储
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: String,
    pub username: String,
    pub display_name: String,
}

/// 当前管理员上下文（认证中间件注入请求扩展）
///
/// # 示例
///
/// ```ignore
/// async fn handler(Extension(admin): Extension<CurrentAdmin>) -> Json<()> {
///     println!("管理员: {}", admin.username);
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: String,
    pub username: String,
    pub display_name: String,
    /// 本次请求携带的会话令牌（登出和 CSRF 绑定需要）
    pub session_token: String,
}

impl CurrentAdmin {
    pub fn from_session(session: AdminSession, session_token: String) -> Self {
        Self {
            id: session.admin_id,
            username: session.username,
            display_name: session.display_name,
            session_token,
        }
    }
}
