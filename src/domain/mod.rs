pub mod email;
pub mod query;
