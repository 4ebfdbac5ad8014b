use config::ConfigError;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// 应用错误类型
///
/// 查询不到记录不是错误，由 `Ok(None)` 表示。
#[derive(Debug, Error)]
pub enum AppError {
    /// 存储层失败（连接、超时、唯一索引冲突），原样向上传递
    #[error("MongoDB error: {0}")]
    Mongo(#[from] MongoError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 是否为唯一索引冲突（E11000）
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            AppError::Mongo(e) => matches!(
                e.kind.as_ref(),
                ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY_CODE
            ),
            _ => false,
        }
    }
}
