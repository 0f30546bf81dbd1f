pub mod config;
pub mod db;
pub mod domain;
pub mod extractors;
pub mod feed;
pub mod forms;
pub mod models;
pub mod notifications;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod throttle;
