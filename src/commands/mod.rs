pub mod history;
pub mod scan;
