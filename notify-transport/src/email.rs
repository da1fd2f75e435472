//! Email transport adapters
//!
//! 通过邮件服务商的 HTTP API 发送（Mailgun 兼容的 form POST）。
//! 未配置服务商时使用 [`LoggingMailer`]（开发环境）。

use crate::error::{TransportError, TransportResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Trait for email transports
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send a plain-text email. Any error means the attempt failed.
    async fn send(&self, to: &str, subject: &str, body: &str) -> TransportResult<()>;
}

/// Mail provider configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Provider domain endpoint, e.g. `https://api.mailgun.net/v3/mg.example.nl`
    pub api_url: String,
    /// Provider API key
    pub api_key: String,
    /// From header, e.g. `Bestellingen <bestellingen@example.nl>`
    pub from: String,
}

/// HTTP API mailer (Mailgun-compatible)
///
/// POSTs `from/to/subject/text` as form fields to `{api_url}/messages`
/// with HTTP basic auth (`api:{key}`).
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> TransportResult<Self> {
        if config.api_url.is_empty() {
            return Err(TransportError::InvalidConfig("api_url is empty".into()));
        }
        if config.api_key.is_empty() {
            return Err(TransportError::InvalidConfig("api_key is empty".into()));
        }
        if config.from.is_empty() {
            return Err(TransportError::InvalidConfig("from address is empty".into()));
        }

        // 连接级超时；每次发送的总体超时由调用方控制
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailTransport for HttpMailer {
    #[instrument(skip(self, body), fields(to = %to, subject = %subject))]
    async fn send(&self, to: &str, subject: &str, body: &str) -> TransportResult<()> {
        let url = format!("{}/messages", self.config.api_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .form(&[
                ("from", self.config.from.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Mail provider rejected send");
            return Err(TransportError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        info!("Email accepted by provider");
        Ok(())
    }
}

/// Development mailer - logs instead of sending, always succeeds
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

#[async_trait]
impl EmailTransport for LoggingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> TransportResult<()> {
        info!(
            to = %to,
            subject = %subject,
            body_len = body.len(),
            "Email transport not configured - logging instead of sending"
        );
        Ok(())
    }
}
