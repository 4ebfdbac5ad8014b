use crate::config::DatabaseConfig;
use crate::errors::AppError;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use once_cell::sync::OnceCell;
use std::time::Duration;

#[derive(Clone)]
pub struct Db {
    pub db: Database,
}

impl Db {
    /// 创建新实例
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 建立 MongoDB 连接；驱动是惰性连接的，这里只解析地址并创建客户端
    pub async fn connect(config: &DatabaseConfig) -> Result<Database, AppError> {
        let mut client_options = ClientOptions::parse(config.url.as_str()).await?;
        if let Some(secs) = config.connect_timeout_secs {
            let timeout = Duration::from_secs(secs);
            client_options.connect_timeout = Some(timeout);
            client_options.server_selection_timeout = Some(timeout);
        }
        let client = Client::with_options(client_options)?;
        Ok(client.database(&config.db_name))
    }

    /// 初始化 MongoDB 数据库连接（全局只允许初始化一次）
    pub async fn init(config: &DatabaseConfig) -> Result<(), AppError> {
        let db = Self::connect(config).await?;
        INSTANCE
            .set(Self::new(db))
            .map_err(|_| AppError::Internal("MongoDB already initialized".to_string()))?;
        log::info!("MongoDB initialized: {}", config.db_name);
        Ok(())
    }

    /// 获取全局数据库实例引用
    pub fn get() -> Result<&'static Database, AppError> {
        INSTANCE
            .get()
            .map(|instance| &instance.db)
            .ok_or_else(|| AppError::Internal("MongoDB is not initialized".to_string()))
    }
}

// 全局单例容器（私有）
static INSTANCE: OnceCell<Db> = OnceCell::new();
