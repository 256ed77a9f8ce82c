//! GUI screens and application state.

pub mod app;
pub mod components;
pub mod edit_absen;
pub mod list_placeholder;

pub use app::App;
