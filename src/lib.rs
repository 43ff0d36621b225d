//! Court Warmup - A multi-court warmup countdown server
//!
//! This library keeps a warmup timer and shuttle counter per court, counts
//! every running timer down from a periodic tick and exposes the courts and
//! their settings over a small JSON API.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use tasks::TickDriver;
pub use utils::signals::shutdown_signal;
