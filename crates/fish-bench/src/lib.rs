pub mod config;
pub mod logging;
pub mod referee;
pub mod runner;
pub mod summary;
