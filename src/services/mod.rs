pub mod config;
pub mod controller;
pub mod history;
pub mod recognition;
pub mod storage;
