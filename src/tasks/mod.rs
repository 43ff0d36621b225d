//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod court_announcer;
pub mod tick_driver;

// Re-export main types
pub use court_announcer::{court_announcer_task, court_events, CourtEvent};
pub use tick_driver::{
    SystemTimeSource, TickClock, TickDriver, TickDriverHandle, TimeSource, DEFAULT_TICK_PERIOD,
};
