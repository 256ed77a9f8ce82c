pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod screen;
pub mod ui;

pub use error::{AppError, Result};
