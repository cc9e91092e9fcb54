pub mod batch;
pub mod config;
pub mod plan;
pub mod util;
