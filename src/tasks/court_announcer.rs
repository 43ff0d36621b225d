//! Court announcer background task

use std::{fmt, sync::Arc};
use tracing::{debug, info};

use crate::{
    state::{AppState, Court, CourtStatus},
    utils::format_millis,
};

/// Something that happened to a court between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourtEvent {
    Added { number: usize },
    Removed { number: usize },
    Started { number: usize, remaining_ms: u64 },
    Paused { number: usize },
    Resumed { number: usize },
    Finished { number: usize },
    Cleared { number: usize },
}

impl fmt::Display for CourtEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { number } => write!(f, "Court {} added", number),
            Self::Removed { number } => write!(f, "Court {} removed", number),
            Self::Started { number, remaining_ms } => write!(
                f,
                "Court {} warmup started ({})",
                number,
                format_millis(Some(*remaining_ms))
            ),
            Self::Paused { number } => write!(f, "Court {} warmup paused", number),
            Self::Resumed { number } => write!(f, "Court {} warmup resumed", number),
            Self::Finished { number } => write!(f, "Court {} warmup finished", number),
            Self::Cleared { number } => write!(f, "Court {} timer cleared", number),
        }
    }
}

/// Compare two snapshots court by court
pub fn court_events(previous: &[Court], current: &[Court]) -> Vec<CourtEvent> {
    let mut events = Vec::new();

    for (old, new) in previous.iter().zip(current) {
        if let Some(event) = transition(old, new) {
            events.push(event);
        }
    }
    for court in current.iter().skip(previous.len()) {
        events.push(CourtEvent::Added { number: court.number() });
    }
    for court in previous.iter().skip(current.len()).rev() {
        events.push(CourtEvent::Removed { number: court.number() });
    }

    events
}

fn transition(old: &Court, new: &Court) -> Option<CourtEvent> {
    let number = new.number();

    if new.reset_count() != old.reset_count() {
        if let Some(remaining_ms) = new.remaining_ms() {
            return Some(CourtEvent::Started { number, remaining_ms });
        }
    }

    match (old.status(), new.status()) {
        (CourtStatus::Counting, CourtStatus::Paused) => Some(CourtEvent::Paused { number }),
        (CourtStatus::Paused, CourtStatus::Counting) => Some(CourtEvent::Resumed { number }),
        (CourtStatus::Done, CourtStatus::Blank) => Some(CourtEvent::Cleared { number }),
        (old, CourtStatus::Done) if old != CourtStatus::Done => Some(CourtEvent::Finished { number }),
        _ => None,
    }
}

/// Background task that logs court status changes as snapshots arrive
pub async fn court_announcer_task(state: Arc<AppState>) {
    info!("Starting court announcer task");

    let mut court_rx = state.subscribe_courts();
    let mut previous = court_rx.borrow_and_update().clone();

    while court_rx.changed().await.is_ok() {
        let current = court_rx.borrow_and_update().clone();

        for event in court_events(&previous, &current) {
            match event {
                CourtEvent::Added { .. } | CourtEvent::Removed { .. } => debug!("{}", event),
                _ => info!("{}", event),
            }
        }

        previous = current;
    }

    debug!("Court update channel closed, announcer stopping");
}
