//! Backoffice Server - 窗饰零售商订单后台
//!
//! # 架构概述
//!
//! 本模块是订单后台服务的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`orders`): 状态里程碑与可插拔转换策略
//! - **客户通知** (`notify`): email/whatsapp 渠道派发 + 仅追加流水
//! - **认证** (`auth`): 不透明会话令牌 + 一次性 CSRF 令牌
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! backoffice-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # 会话/CSRF 令牌存储与中间件
//! ├── orders/        # 订单生命周期
//! ├── notify/        # 通知派发器、worker、文案
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层（模型 + 仓储）
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{AdminSession, CurrentAdmin, MemoryTokenStore, TokenStore};
pub use core::{Config, Server, ServerState};
pub use notify::{Dispatcher, NotificationService};
pub use orders::OrderLifecycle;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____             __         ______
   / __ )____ ______/ /______  / __/ /_(_)_______
  / __  / __ `/ ___/ //_/ __ \/ /_/ __/ / ___/ _ \
 / /_/ / /_/ / /__/ ,< / /_/ / __/ /_/ / /__/  __/
/_____/\__,_/\___/_/|_|\____/_/  \__/_/\___/\___/
    "#
    );
}
