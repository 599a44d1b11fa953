pub mod config;
pub mod db;
pub mod error;
pub mod genai;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;
pub mod store;
