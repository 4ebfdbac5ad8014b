use common::index_trait::MongoIndexModelProvider;
use common::util::password_util::PasswordHasher;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use serde::{Deserialize, Serialize};

/// 默认性别（未填写）
pub const DEFAULT_GENDER: &str = "N";

/// 账号信息，每个注册用户一条
///
/// 非空的用户名与邮箱在存储层有唯一索引，注册前的 `find_data_for_register` 只是预检；
/// 未填写（空字符串）的账号可以有多个。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, MongoDeriveMongoIndex)]
#[mongo_index(fields["profile.username"], unique, non_empty, name("uk_profile_username"))]
#[mongo_index(fields["profile.email"], unique, non_empty, name("uk_profile_email"))]
#[mongo_index(fields["profile.nickname"], name("idx_profile_nickname"))]
#[mongo_index(fields["profile.phoneNumber"], name("idx_profile_phone_number"))]
#[mongo_index(fields["profile.friends.nickname"], name("idx_profile_friends_nickname"))]
pub struct AccountEntity {
    /// 账号唯一 ID
    pub id: String,
    pub profile: ProfileInfo,
    /// HMAC-SHA256 十六进制摘要；未设置密码时不存储
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccountEntity {
    /// 校验密码；账号从未设置密码时一律返回 false
    pub fn validate_password(&self, candidate: &str, hasher: &PasswordHasher) -> bool {
        hasher.verify(candidate, self.password.as_deref())
    }
}

/// 用户可见的资料，字段名按 camelCase 存储（`profile.phoneNumber`）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInfo {
    /// 登录用户名
    pub username: String,
    /// 昵称
    pub nickname: String,
    pub email: String,
    pub age: i32,
    pub city: String,
    /// `N` 表示未填写
    pub gender: String,
    pub phone_number: String,
    /// 头像地址
    pub thumbnail: String,
    /// 好友快照列表，按添加顺序保存
    pub friends: Vec<FriendSummary>,
}

impl Default for ProfileInfo {
    fn default() -> Self {
        Self {
            username: String::new(),
            nickname: String::new(),
            email: String::new(),
            age: 0,
            city: String::new(),
            gender: DEFAULT_GENDER.to_string(),
            phone_number: String::new(),
            thumbnail: String::new(),
            friends: vec![],
        }
    }
}

/// 好友摘要：写入时的快照，不随对方账号变化而同步
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FriendSummary {
    pub id: String,
    pub nickname: String,
    pub age: i32,
    pub city: String,
    pub thumbnail: String,
}

/// 注册参数，未填写的可选字段取默认值
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub phone_number: String,
    pub friends: Vec<FriendSummary>,
    pub thumbnail: Option<String>,
    /// 明文密码，仅用于生成摘要
    pub password: Option<String>,
}

impl NewAccount {
    /// 拆分为资料与明文密码
    pub fn into_profile(self) -> (ProfileInfo, Option<String>) {
        let defaults = ProfileInfo::default();
        let profile = ProfileInfo {
            username: self.username,
            nickname: self.nickname,
            email: self.email,
            age: self.age.unwrap_or(defaults.age),
            city: self.city.unwrap_or(defaults.city),
            gender: self.gender.unwrap_or(defaults.gender),
            phone_number: self.phone_number,
            thumbnail: self.thumbnail.unwrap_or(defaults.thumbnail),
            friends: self.friends,
        };
        (profile, self.password)
    }
}

/// 注册前的冲突预检：任一字段命中即返回
#[derive(Debug, Clone, Default)]
pub struct RegisterProbe {
    pub nickname: String,
    pub email: String,
    pub phone_number: String,
}

/// 登录查找：用户名与邮箱必须同时匹配
#[derive(Debug, Clone, Default)]
pub struct LoginProbe {
    pub username: String,
    pub email: String,
}
