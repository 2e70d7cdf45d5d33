//! Study Spots Server - 自习地点点评服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (spot / review / user / vote)
//! - **评分** (`rating`): 平均星级的增量维护，纯函数
//! - **搜索** (`search`): 类型化谓词构建器
//! - **认证** (`auth`): JWT 会话 Cookie + Argon2
//! - **HTTP API** (`api`): 表单路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! spot-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、会话 Cookie、中间件
//! ├── services/      # 评论编排、图片存储、路由
//! ├── api/           # HTTP 路由和处理器
//! ├── rating/        # 评分聚合
//! ├── search/        # 搜索过滤器
//! ├── utils/         # 错误、日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod rating;
pub mod search;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

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

/// 设置运行环境：加载 `.env`，初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 可选
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(Box::new(e));
        }
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ___  _            _          ___            _
  / __|| |_  _  _  __| | _  _  / __| _ __  ___ | |_  ___
  \__ \|  _|| || |/ _` || || | \__ \| '_ \/ _ \|  _|(_-<
  |___/ \__| \_,_|\__,_| \_, | |___/| .__/\___/ \__|/__/
                         |__/       |_|
    "#
    );
}
