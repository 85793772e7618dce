pub mod config;
pub mod image;
pub mod scan_record;
