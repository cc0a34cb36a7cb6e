// src/lib.rs

pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sources;
pub mod state;
pub mod utils;

// Re-export specific items for convenience if needed
pub use controller::SessionController;
pub use routes::dispatch;
