pub mod config;
pub mod domain;
pub mod error;
pub mod mail;
pub mod mutate;
pub mod query;
pub mod store;
