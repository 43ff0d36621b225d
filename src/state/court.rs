//! Per-court warmup timer

use serde::Serialize;

/// Milliseconds per warmup minute
const MILLIS_PER_MINUTE: u64 = 60_000;

/// Display status of a court timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtStatus {
    /// No timer set, or the last one was cleared
    Blank,
    /// Counting down
    Counting,
    /// Time left but not counting
    Paused,
    /// Elapsed and waiting to be cleared
    Done,
}

impl CourtStatus {
    /// Label of the toggle control for this status
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Self::Blank => "Toggle Timer",
            Self::Counting => "Pause Timer",
            Self::Paused => "Continue Timer",
            Self::Done => "Clear Timer",
        }
    }

    /// Whether the toggle control does anything in this status
    pub fn toggle_enabled(&self) -> bool {
        !matches!(self, Self::Blank)
    }
}

/// Warmup timer and shuttle counter for a single court
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Court {
    index: usize,
    remaining_ms: Option<u64>,
    paused: bool,
    shuttle_count: u32,
    /// Bumped by every reset, so a restart is visible even when the fields match
    resets: u64,
}

impl Court {
    /// Create a blank court with one shuttle
    pub fn new(index: usize) -> Self {
        Self {
            index,
            remaining_ms: None,
            paused: false,
            shuttle_count: 1,
            resets: 0,
        }
    }

    /// Zero-based position in the collection
    pub fn index(&self) -> usize {
        self.index
    }

    /// Court number as shown to players
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.remaining_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn shuttle_count(&self) -> u32 {
        self.shuttle_count
    }

    /// Number of resets since the court was created
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Derive the display status from the timer fields
    pub fn status(&self) -> CourtStatus {
        match self.remaining_ms {
            None => CourtStatus::Blank,
            Some(0) => CourtStatus::Done,
            Some(_) if self.paused => CourtStatus::Paused,
            Some(_) => CourtStatus::Counting,
        }
    }

    /// Count the timer down by `delta_ms`, clamping at zero.
    ///
    /// Does nothing when no timer is set or it is paused. Returns whether the
    /// remaining time changed, so callers only refresh displays when needed.
    pub fn subtract(&mut self, delta_ms: u64) -> bool {
        if self.paused {
            return false;
        }
        let Some(prev) = self.remaining_ms else {
            return false;
        };

        let next = prev.saturating_sub(delta_ms);
        self.remaining_ms = Some(next);
        next != prev
    }

    /// Pause or continue a running timer, or clear an elapsed one.
    ///
    /// No-op on a blank court.
    pub fn toggle_running(&mut self) {
        match self.remaining_ms {
            Some(0) => {
                self.remaining_ms = None;
                self.paused = false;
            }
            Some(_) => self.paused = !self.paused,
            None => {}
        }
    }

    /// Change the shuttle count by `delta`, never going below zero
    pub fn add_shuttles(&mut self, delta: i64) {
        let next = i64::from(self.shuttle_count).saturating_add(delta).max(0);
        self.shuttle_count = u32::try_from(next).unwrap_or(u32::MAX);
    }

    /// Start a fresh warmup of `warmup_minutes` with one shuttle
    pub fn reset(&mut self, warmup_minutes: u64) {
        self.remaining_ms = Some(warmup_minutes.saturating_mul(MILLIS_PER_MINUTE));
        self.paused = false;
        self.shuttle_count = 1;
        self.resets = self.resets.wrapping_add(1);
    }
}
