//! 账号存储的启动引导：加载配置、检查 MongoDB 连通性、补建索引、初始化服务单例后退出。
//!
//! 常驻的接入层（HTTP/RPC）进程在自己的启动流程里调用同样的 `biz_service::init_service`，
//! 之后通过 `AccountService::get()` 取得服务。

use anyhow::Context;
use biz_service::entitys::account_entity::AccountEntity;
use biz_service::util::db_index_util::ensure_indexes;
use common::config::{AppConfig, SysConfig};
use common::db::Db;
use common::util::password_util::PasswordHasher;
use log::{LevelFilter, info};
use mongodb::bson::doc;
use std::str::FromStr;

const DEFAULT_CONFIG_FILE: &str = "main-config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 读取配置文件
    let config_file = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    AppConfig::init(&config_file).with_context(|| format!("load config {}", config_file))?;
    let app_cfg = AppConfig::get()?;
    let sys = app_cfg.get_sys();
    //初始化日志
    init_log(&sys);

    let db_cfg = app_cfg.get_database();
    Db::init(&db_cfg).await?;
    let db = Db::get()?;
    db.run_command(doc! { "ping": 1 }).await.context("MongoDB ping failed")?;

    let created = ensure_indexes::<AccountEntity>(db, &db_cfg.account_collection).await?;
    info!("account indexes ready, {} created", created);

    biz_service::init_service(db, &db_cfg.account_collection, PasswordHasher::new(&sys.secret_key)?)?;
    info!("account store ready: {}.{}", db_cfg.db_name, db_cfg.account_collection);
    Ok(())
}

pub fn init_log(sys: &SysConfig) {
    let level = LevelFilter::from_str(&sys.log_level).unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();
}
