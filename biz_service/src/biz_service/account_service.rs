use crate::entitys::account_entity::{AccountEntity, LoginProbe, NewAccount, RegisterProbe};
use common::errors::AppError;
use common::query_builder::QueryBuilder;
use common::repository_util::{BaseRepository, Repository, UpdateCount};
use common::util::common_utils::build_id;
use common::util::password_util::PasswordHasher;
use mongodb::Database;
use mongodb::bson::doc;
use once_cell::sync::OnceCell;
use std::sync::Arc;

const USERNAME: &str = "profile.username";
const NICKNAME: &str = "profile.nickname";
const EMAIL: &str = "profile.email";
const PHONE_NUMBER: &str = "profile.phoneNumber";
const THUMBNAIL: &str = "profile.thumbnail";
const FRIENDS_NICKNAME: &str = "profile.friends.nickname";

/// 账号存储：按字段查找与创建账号，不含业务规则
///
/// 每个操作只发起一次数据库请求，查不到记录返回 `Ok(None)`，
/// 存储层错误原样以 `AppError::Mongo` 返回。
pub struct AccountService<R = BaseRepository<AccountEntity>> {
    pub dao: R,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(db: &Database, collection_name: &str, hasher: PasswordHasher) -> Self {
        let collection = db.collection(collection_name);
        Self::with_repository(BaseRepository::new(collection), hasher)
    }

    pub fn init(db: &Database, collection_name: &str, hasher: PasswordHasher) -> Result<(), AppError> {
        let instance = Self::new(db, collection_name, hasher);
        INSTANCE
            .set(Arc::new(instance))
            .map_err(|_| AppError::Internal("AccountService already initialized".to_string()))
    }

    /// 获取单例
    pub fn get() -> Result<Arc<Self>, AppError> {
        INSTANCE
            .get()
            .cloned()
            .ok_or_else(|| AppError::Internal("AccountService is not initialized".to_string()))
    }
}

impl<R: Repository<AccountEntity>> AccountService<R> {
    pub fn with_repository(dao: R, hasher: PasswordHasher) -> Self {
        Self { dao, hasher }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<AccountEntity>, AppError> {
        self.find_one_by(USERNAME, username).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<AccountEntity>, AppError> {
        self.find_one_by(EMAIL, email).await
    }

    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Option<AccountEntity>, AppError> {
        self.find_one_by(NICKNAME, nickname).await
    }

    /// 查找好友列表中含有该昵称的账号
    pub async fn find_by_friends_name(&self, friends_name: &str) -> Result<Option<AccountEntity>, AppError> {
        self.find_one_by(FRIENDS_NICKNAME, friends_name).await
    }

    /// 注册冲突预检：昵称、邮箱、手机号任一匹配即返回该账号
    pub async fn find_data_for_register(&self, probe: &RegisterProbe) -> Result<Option<AccountEntity>, AppError> {
        let filter = QueryBuilder::new()
            .eq(NICKNAME, probe.nickname.as_str())
            .or()
            .eq(EMAIL, probe.email.as_str())
            .or()
            .eq(PHONE_NUMBER, probe.phone_number.as_str())
            .build();
        log::debug!("find_data_for_register: {}", filter);
        Ok(self.dao.find_one(filter).await?)
    }

    /// 登录查找：用户名与邮箱同时匹配，不校验密码
    pub async fn find_data_for_login(&self, probe: &LoginProbe) -> Result<Option<AccountEntity>, AppError> {
        let filter = QueryBuilder::new()
            .eq(USERNAME, probe.username.as_str())
            .and()
            .eq(EMAIL, probe.email.as_str())
            .build();
        log::debug!("find_data_for_login: {}", filter);
        Ok(self.dao.find_one(filter).await?)
    }

    /// 创建账号并写入存储，返回写入的记录
    ///
    /// 不做唯一性检查；重复的用户名或邮箱由唯一索引拒绝，表现为存储层错误。
    pub async fn register(&self, new_account: NewAccount) -> Result<AccountEntity, AppError> {
        let (profile, password) = new_account.into_profile();
        let account = AccountEntity {
            id: build_id(),
            profile,
            password: password.map(|p| self.hasher.hash(&p)),
        };
        if let Err(e) = self.dao.insert(&account).await {
            log::error!("register account failed: username={}, {}", account.profile.username, e);
            return Err(e.into());
        }
        log::info!("account registered: id={}, username={}", account.id, account.profile.username);
        Ok(account)
    }

    /// 按邮箱更新头像；邮箱不存在时 `matched = 0`，不视为错误
    pub async fn update_thumbnail_by_email(&self, email: &str, thumbnail: &str) -> Result<UpdateCount, AppError> {
        let filter = doc! { EMAIL: email };
        let update = doc! { "$set": { THUMBNAIL: thumbnail } };
        let count = self.dao.update_one(filter, update).await?;
        log::debug!("update thumbnail: email={}, matched={}, modified={}", email, count.matched, count.modified);
        Ok(count)
    }

    pub fn validate_password(&self, account: &AccountEntity, candidate: &str) -> bool {
        account.validate_password(candidate, &self.hasher)
    }

    async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<AccountEntity>, AppError> {
        let filter = QueryBuilder::new().eq(field, value).build();
        log::debug!("find account: {}", filter);
        Ok(self.dao.find_one(filter).await?)
    }
}

static INSTANCE: OnceCell<Arc<AccountService>> = OnceCell::new();
