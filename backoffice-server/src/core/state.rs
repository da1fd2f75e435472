use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{AdminSession, MemoryTokenStore, TokenStore};
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::db::repository::{AdminRepository, NotificationLogRepository};
use crate::notify::{Dispatcher, NotificationService, NotifyWorker};
use crate::orders::OrderLifecycle;
use notify_transport::{
    EmailTransport, HttpMailer, LoggingMailer, LoggingMessenger, MailerConfig,
};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | sessions | MemoryTokenStore<AdminSession> | 会话令牌存储 (可重用) |
/// | csrf_tokens | MemoryTokenStore<()> | CSRF 令牌存储 (一次性) |
/// | notifications | NotificationService | 通知入队 |
/// | lifecycle | OrderLifecycle | 订单状态转换策略 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 会话令牌存储（进程易失 — 重启后管理员重新登录）
    pub sessions: Arc<MemoryTokenStore<AdminSession>>,
    /// CSRF 令牌存储（一次性，绑定会话）
    pub csrf_tokens: Arc<MemoryTokenStore<()>>,
    /// 通知服务（入队端）
    pub notifications: Arc<NotificationService>,
    /// 订单生命周期
    pub lifecycle: Arc<OrderLifecycle>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/backoffice.db)
    /// 3. 种子管理员账号
    /// 4. 令牌存储、通知服务、生命周期
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("backoffice.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // Seed default admin (no-op when present)
        AdminRepository::new(db.clone())
            .ensure_default_admin(&config.admin_username, &config.admin_password)
            .await
            .expect("Failed to seed default admin account");

        Self::with_db(config.clone(), db)
    }

    /// 基于现成数据库句柄构造状态（测试用内存库走这里）
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let notifications = NotificationService::new(config.notify_buffer_size.max(1));
        Self {
            config,
            db,
            sessions: Arc::new(MemoryTokenStore::reusable()),
            csrf_tokens: Arc::new(MemoryTokenStore::single_use()),
            notifications,
            lifecycle: Arc::new(OrderLifecycle::permissive()),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 的 serve 之前调用
    ///
    /// 启动的任务：
    /// - 通知派发 worker
    /// - 过期令牌清扫
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        self.spawn_notify_worker(tasks);
        self.spawn_token_sweeper(tasks);
    }

    fn spawn_notify_worker(&self, tasks: &mut BackgroundTasks) {
        let Some(rx) = self.notifications.take_receiver() else {
            tracing::warn!("Notification worker already started, skipping");
            return;
        };

        let email: Arc<dyn EmailTransport> = if self.config.mailer_configured() {
            match HttpMailer::new(MailerConfig {
                api_url: self.config.mail_api_url.clone(),
                api_key: self.config.mail_api_key.clone(),
                from: self.config.mail_from.clone(),
            }) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid mailer config — falling back to logging mailer");
                    Arc::new(LoggingMailer)
                }
            }
        } else {
            tracing::info!("Mail provider not configured — email notifications are logged only");
            Arc::new(LoggingMailer)
        };

        let dispatcher = Dispatcher::new(
            email,
            Arc::new(LoggingMessenger),
            NotificationLogRepository::new(self.db.clone()),
            self.config.notify_send_timeout(),
        );

        let token = tasks.shutdown_token();
        tasks.spawn("notify_worker", TaskKind::Worker, async move {
            let worker = NotifyWorker::new(dispatcher);
            tokio::select! {
                _ = token.cancelled() => {}
                _ = worker.run(rx) => {}
            }
        });
    }

    fn spawn_token_sweeper(&self, tasks: &mut BackgroundTasks) {
        let sessions = self.sessions.clone();
        let csrf_tokens = self.csrf_tokens.clone();
        let interval = std::time::Duration::from_secs(self.config.token_sweep_interval_secs.max(1));
        let token = tasks.shutdown_token();

        tasks.spawn("token_sweeper", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(interval);
            // 第一个 tick 立即触发，跳过
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let swept = sessions.sweep_expired() + csrf_tokens.sweep_expired();
                        if swept > 0 {
                            tracing::debug!(swept, "Expired tokens swept");
                        }
                    }
                }
            }
        });
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test state over the in-memory engine
    pub(crate) async fn test_state() -> ServerState {
        let db = DbService::memory().await;
        let config = Config::with_overrides("/tmp/backoffice-test", 0);
        ServerState::with_db(config, db.db)
    }

    #[tokio::test]
    async fn background_tasks_start_and_stop() {
        let state = test_state().await;
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        assert_eq!(tasks.len(), 2);

        tokio::time::timeout(std::time::Duration::from_secs(2), tasks.shutdown())
            .await
            .expect("shutdown timed out");
    }

    #[tokio::test]
    async fn notify_worker_cannot_start_twice() {
        let state = test_state().await;
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);

        let mut more_tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut more_tasks);
        // 第二次只剩 sweeper — worker 的接收端已被取走
        assert_eq!(more_tasks.len(), 1);

        tasks.shutdown().await;
        more_tasks.shutdown().await;
    }
}
