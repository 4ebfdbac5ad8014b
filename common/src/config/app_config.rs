use crate::errors::AppError;
use config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;

/// 账号集合默认名称
pub const DEFAULT_ACCOUNT_COLLECTION: &str = "accounts";
/// 密钥缺省时读取的环境变量
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub sys: Option<SysConfig>,
}

impl AppConfig {
    /// 加载配置文件，并叠加 `APP__` 前缀的环境变量（如 `APP__SYS__SECRET_KEY`）
    pub fn new(file: &str) -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(config::File::with_name(file).required(true))
            .add_source(config::Environment::with_prefix("APP").prefix_separator("__").separator("__"))
            .build()?;
        let cfg = config.try_deserialize::<AppConfig>()?;
        Ok(cfg)
    }

    pub fn init(file: &str) -> Result<(), AppError> {
        let instance = Self::new(file)?;
        INSTANCE
            .set(Arc::new(instance))
            .map_err(|_| AppError::Internal("AppConfig already initialized".to_string()))
    }

    pub fn get_database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }

    /// 系统配置；`secret_key` 为空时回退到 `SECRET_KEY` 环境变量
    pub fn get_sys(&self) -> SysConfig {
        let mut sys = self.sys.clone().unwrap_or_default();
        if sys.secret_key.is_empty() {
            if let Ok(key) = std::env::var(SECRET_KEY_ENV) {
                sys.secret_key = key;
            }
        }
        sys
    }

    /// 获取单例
    pub fn get() -> Result<Arc<Self>, AppError> {
        INSTANCE
            .get()
            .cloned()
            .ok_or_else(|| AppError::Internal("AppConfig is not initialized".to_string()))
    }
}
static INSTANCE: OnceCell<Arc<AppConfig>> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub db_name: String,
    #[serde(default = "default_account_collection")]
    pub account_collection: String,
    //连接与选主超时（秒），不配置则使用驱动默认值
    pub connect_timeout_secs: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            db_name: "account".to_string(),
            account_collection: default_account_collection(),
            connect_timeout_secs: None,
        }
    }
}

fn default_account_collection() -> String {
    DEFAULT_ACCOUNT_COLLECTION.to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SysConfig {
    //全局日志级别
    #[serde(default)]
    pub log_level: String,
    //密码 HMAC 密钥
    #[serde(default)]
    pub secret_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_database_and_sys_sections() {
        let file = write_config(
            r#"
[database]
url = "mongodb://db.internal:27017"
db_name = "social"
connect_timeout_secs = 3

[sys]
log_level = "debug"
secret_key = "s3cret"
"#,
        );
        let cfg = AppConfig::new(file.path().to_str().unwrap()).unwrap();
        let db = cfg.get_database();
        assert_eq!(db.url, "mongodb://db.internal:27017");
        assert_eq!(db.db_name, "social");
        assert_eq!(db.account_collection, DEFAULT_ACCOUNT_COLLECTION);
        assert_eq!(db.connect_timeout_secs, Some(3));
        let sys = cfg.get_sys();
        assert_eq!(sys.log_level, "debug");
        assert_eq!(sys.secret_key, "s3cret");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_config("");
        let cfg = AppConfig::new(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.get_database().account_collection, "accounts");
        assert_eq!(cfg.get_database().db_name, "account");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = AppConfig::new("/nonexistent/dir/main-config.toml").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
