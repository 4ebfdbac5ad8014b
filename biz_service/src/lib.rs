use common::errors::AppError;
use common::util::password_util::PasswordHasher;
use mongodb::Database;

pub mod biz_service;
pub mod entitys;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub fn init_service(db: &Database, account_collection: &str, hasher: PasswordHasher) -> Result<(), AppError> {
    biz_service::init_service(db, account_collection, hasher)
}
