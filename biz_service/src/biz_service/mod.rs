pub mod account_service;

use common::errors::AppError;
use common::util::password_util::PasswordHasher;
use mongodb::Database;

pub fn init_service(db: &Database, account_collection: &str, hasher: PasswordHasher) -> Result<(), AppError> {
    account_service::AccountService::init(db, account_collection, hasher)
}
