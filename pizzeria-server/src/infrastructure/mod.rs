pub mod config;
pub mod database;
pub mod google;
pub mod logging;
pub mod security;
