use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{SpotRepository, UserRepository};
use crate::services::{ImageStore, ReviewService};
use crate::utils::{AppError, AppResult};

/// Database file name under the database dir
const DB_FILE: &str = "spots.db";

/// 服务器状态 - 持有所有服务的共享引用
///
/// 只读；Clone 成本很低。会话身份不存放在这里，而是随每个请求的令牌而来。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | images | ImageStore | 图片存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 上传图片存储
    pub images: ImageStore,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        let images = ImageStore::new(config.uploads_dir(), config.max_upload_bytes);
        Self {
            config,
            db,
            jwt_service,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/spots.db)，打不开时直接返回错误
    /// 3. JWT 服务
    /// 4. 版主账号 (如已配置)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.ensure_work_dir_structure().map_err(|e| {
            AppError::internal(format!("Failed to create work directory structure: {}", e))
        })?;

        let db_path = config.database_dir().join(DB_FILE);
        let db_service = DbService::new(&db_path).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self::new(config.clone(), db_service.db, jwt_service);

        if let Some((username, password)) = &config.moderator {
            let moderator = state.users().ensure_moderator(username, password).await?;
            tracing::info!(username = %moderator.username, "Moderator account ready");
        }

        Ok(state)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn spots(&self) -> SpotRepository {
        SpotRepository::new(self.get_db())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.get_db())
    }

    pub fn review_service(&self) -> ReviewService {
        ReviewService::new(self.get_db())
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}
