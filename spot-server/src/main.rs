use anyhow::Context;
use spot_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment().map_err(|e| anyhow::anyhow!("Failed to set up environment: {}", e))?;

    print_banner();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化服务器状态 (数据库打不开时直接退出)
    let state = ServerState::initialize(&config)
        .await
        .inspect_err(|e| tracing::error!("Startup failed: {}", e))
        .context("Failed to initialize server state")?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
