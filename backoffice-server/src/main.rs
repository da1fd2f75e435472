use backoffice_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (dotenv 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    // 3. 日志 (文件输出到 work_dir/logs)
    let log_dir = config.log_dir();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.to_str(),
    );

    print_banner();
    tracing::info!("Backoffice server starting...");

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config).await;

    // 5. 启动 HTTP 服务器 (Server::run 会自动启动后台任务)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
