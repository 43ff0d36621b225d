use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

use court_warmup::{
    state::{AppState, CourtStatus, Settings},
    tasks::{TickDriver, TimeSource},
};

/// Wall-clock time that advances with tokio's paused clock
#[derive(Debug)]
struct VirtualWallClock {
    wall_origin: DateTime<Utc>,
    origin: Instant,
}

impl VirtualWallClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            wall_origin: Utc::now(),
            origin: Instant::now(),
        })
    }
}

impl TimeSource for VirtualWallClock {
    fn now(&self) -> DateTime<Utc> {
        self.wall_origin + TimeDelta::from_std(self.origin.elapsed()).unwrap()
    }
}

fn empty_state() -> Arc<AppState> {
    Arc::new(AppState::new(0, "127.0.0.1".to_string(), Settings::new(0, 8), Settings::new(0, 8)))
}

fn statuses(state: &AppState) -> Vec<CourtStatus> {
    state.get_courts().unwrap().iter().map(|c| c.status()).collect()
}

#[test]
fn test_one_court_warms_up_while_others_stay_blank() {
    let state = empty_state();

    state.apply_settings(Settings::new(3, 8)).unwrap();
    let indices: Vec<usize> = state.get_courts().unwrap().iter().map(|c| c.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(statuses(&state), vec![CourtStatus::Blank; 3]);

    let court = state.reset_court(1).unwrap().unwrap();
    assert_eq!(court.remaining_ms(), Some(480_000));

    assert!(state.tick(480_000).unwrap());
    assert_eq!(state.get_court(1).unwrap().unwrap().remaining_ms(), Some(0));
    assert_eq!(
        statuses(&state),
        vec![CourtStatus::Blank, CourtStatus::Done, CourtStatus::Blank]
    );

    state.toggle_court(1).unwrap();
    assert_eq!(statuses(&state), vec![CourtStatus::Blank; 3]);
}

#[test]
fn test_paused_court_survives_ticks_and_resizes() {
    let state = empty_state();
    state.apply_settings(Settings::new(2, 8)).unwrap();
    state.reset_court(0).unwrap();
    state.tick(30_000).unwrap();
    state.toggle_court(0).unwrap();

    state.tick(60_000).unwrap();
    state.apply_settings(Settings::new(1, 8)).unwrap();
    state.apply_settings(Settings::new(1, 8)).unwrap();

    let court = state.get_court(0).unwrap().unwrap();
    assert_eq!(court.remaining_ms(), Some(450_000));
    assert!(court.is_paused());
    assert_eq!(state.get_courts().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_driver_finishes_a_warmup() {
    let state = empty_state();
    state.apply_settings(Settings::new(2, 1)).unwrap();
    state.reset_court(0).unwrap();

    let handle = TickDriver::new(Arc::clone(&state), Duration::from_millis(250))
        .with_time_source(VirtualWallClock::new())
        .start();
    tokio::time::sleep(Duration::from_secs(61)).await;
    handle.stop().await;

    assert_eq!(statuses(&state), vec![CourtStatus::Done, CourtStatus::Blank]);
}
