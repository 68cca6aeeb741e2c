extern crate alloc;

pub mod analytics;
pub mod models;
