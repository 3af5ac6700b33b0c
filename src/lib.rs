pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod migrations;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;
pub mod services;

/// Currency applied to payments when the caller does not provide one.
pub const DEFAULT_CURRENCY: &str = "MZN";
