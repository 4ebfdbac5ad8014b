pub mod account_entity;
