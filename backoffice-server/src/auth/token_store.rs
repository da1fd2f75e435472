//! 令牌存储
//!
//! 会话令牌和 CSRF 令牌共用同一个存储抽象：不透明随机令牌 →
//! 负载 + 过期时间（+ 可选上下文绑定）。存储是易失的 —
//! 进程重启即全部失效，这是设计选择（管理员重新登录即可）。
//!
//! 两种使用模式：
//! - 会话存储（可重用）：验证成功后令牌保留，直到过期或显式登出
//! - CSRF 存储（一次性）：验证成功即消费令牌
//!
//! `validate` 是全函数 — 对外只有 Valid/Invalid 两种结果。
//! 未找到/已过期/绑定不匹配的区别只进内部日志（避免信息泄露）。

use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::time::Duration;
use thiserror::Error;

/// 令牌熵大小（字节），hex 编码后 64 字符
const TOKEN_BYTES: usize = 32;

/// Token store error types
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to generate token entropy")]
    Entropy,

    /// 32 字节熵下碰撞概率可忽略；真发生时宁可报错也不覆盖
    #[error("Token collision detected")]
    Collision,
}

/// A freshly issued token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Unix 毫秒过期时间戳
    pub expires_at: i64,
}

/// Outcome of a validation call — deliberately coarse
#[derive(Debug)]
pub enum Validation<P> {
    Valid(P),
    Invalid,
}

impl<P> Validation<P> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_payload(self) -> Option<P> {
        match self {
            Validation::Valid(p) => Some(p),
            Validation::Invalid => None,
        }
    }
}

/// Injected store abstraction — a persistent backing store can be
/// substituted without touching callers.
pub trait TokenStore<P>: Send + Sync
where
    P: Clone + Send + Sync + 'static,
{
    /// Generate and store a new token. Sweeps expired entries
    /// opportunistically.
    fn issue(
        &self,
        payload: P,
        binding: Option<String>,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenStoreError>;

    /// Look up a token. Total — never panics, never errors outward.
    /// Single-use stores consume the token on success.
    fn validate(&self, token: &str, binding: Option<&str>) -> Validation<P>;

    /// Remove a token unconditionally (logout). Returns whether it existed.
    fn revoke(&self, token: &str) -> bool;

    /// Remove all expired entries; safe to call concurrently.
    fn sweep_expired(&self) -> usize;
}

struct TokenEntry<P> {
    payload: P,
    binding: Option<String>,
    #[allow(dead_code)]
    created_at: i64,
    expires_at: i64,
}

/// In-memory token store over a concurrent map
pub struct MemoryTokenStore<P> {
    entries: DashMap<String, TokenEntry<P>>,
    single_use: bool,
    rng: SystemRandom,
}

impl<P> MemoryTokenStore<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Store whose tokens survive validation (auth sessions)
    pub fn reusable() -> Self {
        Self {
            entries: DashMap::new(),
            single_use: false,
            rng: SystemRandom::new(),
        }
    }

    /// Store whose tokens are consumed by a successful validation (CSRF)
    pub fn single_use() -> Self {
        Self {
            entries: DashMap::new(),
            single_use: true,
            rng: SystemRandom::new(),
        }
    }

    /// Number of live entries (includes not-yet-swept expired ones)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn generate_token(&self) -> Result<String, TokenStoreError> {
        let mut buf = [0u8; TOKEN_BYTES];
        self.rng
            .fill(&mut buf)
            .map_err(|_| TokenStoreError::Entropy)?;
        Ok(hex::encode(buf))
    }
}

impl<P> std::fmt::Debug for MemoryTokenStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("entries", &self.entries.len())
            .field("single_use", &self.single_use)
            .finish_non_exhaustive()
    }
}

impl<P> TokenStore<P> for MemoryTokenStore<P>
where
    P: Clone + Send + Sync + 'static,
{
    fn issue(
        &self,
        payload: P,
        binding: Option<String>,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenStoreError> {
        self.sweep_expired();

        let token = self.generate_token()?;
        let now = shared::util::now_millis();
        let expires_at = now + ttl.as_millis() as i64;

        use dashmap::mapref::entry::Entry;
        match self.entries.entry(token.clone()) {
            Entry::Occupied(_) => Err(TokenStoreError::Collision),
            Entry::Vacant(vacant) => {
                vacant.insert(TokenEntry {
                    payload,
                    binding,
                    created_at: now,
                    expires_at,
                });
                Ok(IssuedToken { token, expires_at })
            }
        }
    }

    fn validate(&self, token: &str, binding: Option<&str>) -> Validation<P> {
        use dashmap::mapref::entry::Entry;

        match self.entries.entry(token.to_string()) {
            Entry::Vacant(_) => {
                tracing::debug!(target: "auth", "Token rejected: unknown");
                Validation::Invalid
            }
            Entry::Occupied(occupied) => {
                let entry = occupied.get();

                if shared::util::now_millis() > entry.expires_at {
                    occupied.remove();
                    tracing::debug!(target: "auth", "Token rejected: expired");
                    return Validation::Invalid;
                }

                if entry.binding.as_deref() != binding {
                    tracing::debug!(target: "auth", "Token rejected: binding mismatch");
                    return Validation::Invalid;
                }

                let payload = entry.payload.clone();
                if self.single_use {
                    occupied.remove();
                }
                Validation::Valid(payload)
            }
        }
    }

    fn revoke(&self, token: &str) -> bool {
        self.entries.remove(token).is_some()
    }

    fn sweep_expired(&self) -> usize {
        let now = shared::util::now_millis();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at >= now);
        before.saturating_sub(self.entries.len())
    }
}
