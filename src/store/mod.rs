pub mod json_file;
pub mod memory;
pub mod repo;
