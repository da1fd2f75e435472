//! Messaging (WhatsApp-style) transport adapters
//!
//! 当前只提供日志桩实现 — 契约与真实服务商一致，
//! 接入真实服务商时 Dispatcher 无需改动。

use crate::error::TransportResult;
use async_trait::async_trait;
use tracing::{info, instrument};

/// Trait for messaging transports
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send a single text message. Any error means the attempt failed.
    async fn send(&self, to: &str, message: &str) -> TransportResult<()>;
}

/// Logging stub messenger
///
/// Records the outgoing message at info level and reports success.
#[derive(Debug, Clone, Default)]
pub struct LoggingMessenger;

#[async_trait]
impl MessageTransport for LoggingMessenger {
    #[instrument(skip(self, message), fields(to = %to))]
    async fn send(&self, to: &str, message: &str) -> TransportResult<()> {
        info!(message = %message, "WhatsApp message (stub transport)");
        Ok(())
    }
}
