use crate::errors::AppError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// 密码摘要：HMAC-SHA256(secret_key, password)，十六进制存储
///
/// 密钥由调用方显式注入，不读取全局配置。
#[derive(Clone)]
pub struct PasswordHasher {
    mac: HmacSha256,
}

impl PasswordHasher {
    pub fn new(secret_key: &str) -> Result<Self, AppError> {
        if secret_key.is_empty() {
            log::warn!("password secret key is empty, hashes are unkeyed");
        }
        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| AppError::Internal(format!("invalid hmac key: {}", e)))?;
        Ok(Self { mac })
    }

    pub fn hash(&self, password: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// 常量时间比较；存储值缺失或不是合法十六进制时返回 false
    pub fn verify(&self, candidate: &str, stored_hash: Option<&str>) -> bool {
        let Some(stored) = stored_hash else {
            return false;
        };
        let Ok(expected) = hex::decode(stored) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(candidate.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
