// Library exports for testing
pub mod api;
pub mod config;
pub mod db;
pub mod envelope;
pub mod errors;
pub mod models;
pub mod utils;
