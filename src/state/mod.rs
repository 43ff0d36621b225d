//! State management module
//!
//! This module contains the court timers, their collection, the shared
//! settings and the application state that ties them together.

pub mod app_state;
pub mod collection;
pub mod court;
pub mod settings;

// Re-export main types
pub use app_state::AppState;
pub use collection::{CourtCollection, Resize};
pub use court::{Court, CourtStatus};
pub use settings::{parse_int_value, Settings, SettingsQuery, DEFAULT_WARMUP_MINUTES, MAX_COURT_COUNT};
