pub mod common_utils;
pub mod password_util;
