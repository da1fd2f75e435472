use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置 - 后台服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/backoffice | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SESSION_TTL_MINUTES | 480 | 会话令牌有效期 |
/// | CSRF_TTL_MINUTES | 30 | CSRF 令牌有效期 |
/// | TOKEN_SWEEP_INTERVAL_SECS | 60 | 过期令牌清扫间隔 |
/// | NOTIFY_BUFFER_SIZE | 256 | 通知队列容量 |
/// | NOTIFY_SEND_TIMEOUT_MS | 5000 | 单渠道发送超时 |
/// | MAIL_API_URL | (空) | 邮件服务商端点，空 = 未配置 |
/// | MAIL_API_KEY | (空) | 邮件服务商密钥 |
/// | MAIL_FROM | (空) | 发件人地址 |
/// | ADMIN_USERNAME | beheer | 默认管理员用户名 |
/// | ADMIN_PASSWORD | (见下) | 默认管理员密码 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/backoffice HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 令牌 ===
    /// 会话令牌有效期（分钟）
    pub session_ttl_minutes: i64,
    /// CSRF 令牌有效期（分钟）
    pub csrf_ttl_minutes: i64,
    /// 过期令牌清扫间隔（秒）
    pub token_sweep_interval_secs: u64,

    // === 通知 ===
    /// 通知队列容量
    pub notify_buffer_size: usize,
    /// 单渠道发送超时（毫秒），超时按失败落账
    pub notify_send_timeout_ms: u64,
    /// 邮件服务商端点（空 = 未配置，使用日志桩）
    pub mail_api_url: String,
    /// 邮件服务商密钥
    pub mail_api_key: String,
    /// 发件人地址
    pub mail_from: String,

    // === 管理员种子账号 ===
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/backoffice".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(480),
            csrf_ttl_minutes: std::env::var("CSRF_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            token_sweep_interval_secs: std::env::var("TOKEN_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),

            notify_buffer_size: std::env::var("NOTIFY_BUFFER_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
            notify_send_timeout_ms: std::env::var("NOTIFY_SEND_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            mail_api_url: std::env::var("MAIL_API_URL").unwrap_or_default(),
            mail_api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: std::env::var("MAIL_FROM").unwrap_or_default(),

            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "beheer".into()),
            admin_password: load_admin_password(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 邮件服务商是否已配置
    pub fn mailer_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty() && !self.mail_from.is_empty()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs((self.session_ttl_minutes.max(1) as u64) * 60)
    }

    pub fn csrf_ttl(&self) -> Duration {
        Duration::from_secs((self.csrf_ttl_minutes.max(1) as u64) * 60)
    }

    pub fn notify_send_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_send_timeout_ms.max(1))
    }
}

/// 从环境变量安全地加载默认管理员密码
///
/// 生产环境必须显式设置；开发环境回落到固定值并告警。
fn load_admin_password() -> String {
    match std::env::var("ADMIN_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "ADMIN_PASSWORD not set — using development default. Set it in production!"
                );
                "wachtwoord-dev".to_string()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("ADMIN_PASSWORD environment variable must be set in production!");
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
