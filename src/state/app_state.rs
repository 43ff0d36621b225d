//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Court, CourtCollection, Resize, Settings, SettingsQuery};

/// Main application state that owns every court and the shared settings
#[derive(Debug)]
pub struct AppState {
    /// Courts in display order
    pub courts: Arc<Mutex<CourtCollection>>,
    /// Current court count and warmup length
    pub settings: Arc<Mutex<Settings>>,
    /// Used for any query value that is missing or unparsable
    pub defaults: Settings,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for court snapshots, sent whenever a court changes
    pub court_update_tx: watch::Sender<Vec<Court>>,
    /// Keep the receiver alive to prevent channel closure
    pub _court_update_rx: watch::Receiver<Vec<Court>>,
}

impl AppState {
    /// Create a new AppState with `initial` applied and `defaults` as fallback
    pub fn new(port: u16, host: String, initial: Settings, defaults: Settings) -> Self {
        let mut courts = CourtCollection::new();
        courts.set_desired_count(initial.court_count);
        let (court_update_tx, court_update_rx) = watch::channel(courts.snapshot());

        Self {
            courts: Arc::new(Mutex::new(courts)),
            settings: Arc::new(Mutex::new(initial)),
            defaults,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            court_update_tx,
            _court_update_rx: court_update_rx,
        }
    }

    /// Apply `updater` to one court and publish the new snapshot.
    ///
    /// Returns `Ok(None)` when no court has that index.
    pub fn update_court<F>(&self, action: &str, index: usize, updater: F) -> Result<Option<Court>, String>
    where
        F: FnOnce(&mut Court),
    {
        let courts = self.courts.lock()
            .map_err(|e| format!("Failed to lock courts: {}", e))?;
        self.apply_to_court(courts, action, index, updater)
    }

    /// Pause, continue or clear a court's timer
    pub fn toggle_court(&self, index: usize) -> Result<Option<Court>, String> {
        debug!("Toggling court index {}", index);
        self.update_court("toggle", index, Court::toggle_running)
    }

    /// Change a court's shuttle count
    pub fn add_shuttles(&self, index: usize, delta: i64) -> Result<Option<Court>, String> {
        debug!("Changing shuttles on court index {} by {}", index, delta);
        self.update_court("shuttles", index, |court| court.add_shuttles(delta))
    }

    /// Restart a court's warmup with the current warmup length.
    ///
    /// Settings stay locked until the court is reset, so a concurrent settings
    /// change cannot land in between.
    pub fn reset_court(&self, index: usize) -> Result<Option<Court>, String> {
        let settings = self.settings.lock()
            .map_err(|e| format!("Failed to lock settings: {}", e))?;
        let courts = self.courts.lock()
            .map_err(|e| format!("Failed to lock courts: {}", e))?;

        let warmup_minutes = settings.warmup_minutes;
        info!("Resetting court index {} to a {} minute warmup", index, warmup_minutes);
        let result = self.apply_to_court(courts, "reset", index, |court| court.reset(warmup_minutes));
        drop(settings);

        result
    }

    /// Store new settings and resize the collection to match
    pub fn apply_settings(&self, new_settings: Settings) -> Result<Resize, String> {
        let mut settings = self.settings.lock()
            .map_err(|e| format!("Failed to lock settings: {}", e))?;
        let mut courts = self.courts.lock()
            .map_err(|e| format!("Failed to lock courts: {}", e))?;

        let resize = courts.set_desired_count(new_settings.court_count);
        *settings = new_settings;
        let snapshot = courts.snapshot();
        drop(courts);
        drop(settings);

        info!(
            "Settings applied: {} courts, {} minute warmup ({} added, {} removed)",
            new_settings.court_count,
            new_settings.warmup_minutes,
            resize.added.len(),
            resize.removed.len()
        );
        self.record_action("settings");
        if !resize.is_empty() {
            self.publish(snapshot);
        }

        Ok(resize)
    }

    /// Resolve raw query values against the defaults and apply them
    pub fn apply_settings_query(&self, query: &SettingsQuery) -> Result<Settings, String> {
        let settings = Settings::from_query(query, self.defaults);
        self.apply_settings(settings)?;
        Ok(settings)
    }

    /// Get current settings
    pub fn get_settings(&self) -> Result<Settings, String> {
        self.settings.lock()
            .map(|settings| *settings)
            .map_err(|e| format!("Failed to lock settings: {}", e))
    }

    /// Get a copy of every court
    pub fn get_courts(&self) -> Result<Vec<Court>, String> {
        self.courts.lock()
            .map(|courts| courts.snapshot())
            .map_err(|e| format!("Failed to lock courts: {}", e))
    }

    /// Get a copy of one court
    pub fn get_court(&self, index: usize) -> Result<Option<Court>, String> {
        self.courts.lock()
            .map(|courts| courts.get(index).cloned())
            .map_err(|e| format!("Failed to lock courts: {}", e))
    }

    /// Count every court down by `delta_ms`.
    ///
    /// A snapshot is only published when some court's remaining time changed.
    pub fn tick(&self, delta_ms: u64) -> Result<bool, String> {
        let mut courts = self.courts.lock()
            .map_err(|e| format!("Failed to lock courts: {}", e))?;

        if courts.is_empty() {
            return Ok(false);
        }

        let changed = courts.tick(delta_ms);
        if changed {
            let snapshot = courts.snapshot();
            drop(courts);
            self.publish(snapshot);
        }

        Ok(changed)
    }

    /// Watch court snapshots as they change
    pub fn subscribe_courts(&self) -> watch::Receiver<Vec<Court>> {
        self.court_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn apply_to_court<F>(
        &self,
        mut courts: MutexGuard<'_, CourtCollection>,
        action: &str,
        index: usize,
        updater: F,
    ) -> Result<Option<Court>, String>
    where
        F: FnOnce(&mut Court),
    {
        let Some(court) = courts.get_mut(index) else {
            return Ok(None);
        };
        let before = court.clone();
        updater(court);
        let updated = court.clone();

        if updated == before {
            debug!("Court {} unchanged by {}", updated.number(), action);
            return Ok(Some(updated));
        }

        let snapshot = courts.snapshot();
        drop(courts); // Release the lock early

        self.record_action(action);
        self.publish(snapshot);

        Ok(Some(updated))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, snapshot: Vec<Court>) {
        if let Err(e) = self.court_update_tx.send(snapshot) {
            warn!("Failed to send court update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CourtStatus, DEFAULT_WARMUP_MINUTES};

    fn state_with(courts: usize) -> AppState {
        let settings = Settings::new(courts, DEFAULT_WARMUP_MINUTES);
        AppState::new(0, "127.0.0.1".to_string(), settings, Settings::default())
    }

    #[test]
    fn test_new_state_creates_initial_courts() {
        let state = state_with(3);
        let courts = state.get_courts().unwrap();
        assert_eq!(courts.len(), 3);
        assert!(courts.iter().all(|c| c.status() == CourtStatus::Blank));
        assert_eq!(state.get_last_action(), (None, None));
    }

    #[test]
    fn test_unknown_court_is_none() {
        let state = state_with(1);
        assert!(state.toggle_court(5).unwrap().is_none());
        assert!(state.get_court(1).unwrap().is_none());
    }

    #[test]
    fn test_noop_toggle_is_not_recorded_or_published() {
        let state = state_with(1);
        let mut rx = state.subscribe_courts();
        rx.mark_unchanged();

        let court = state.toggle_court(0).unwrap().unwrap();
        assert_eq!(court, Court::new(0));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(state.get_last_action(), (None, None));
    }

    #[test]
    fn test_repeated_reset_is_published() {
        let state = state_with(1);
        state.reset_court(0).unwrap();
        let mut rx = state.subscribe_courts();
        rx.mark_unchanged();

        state.reset_court(0).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[0].reset_count(), 2);
    }

    #[test]
    fn test_reset_waits_for_settings_change() {
        let state = Arc::new(state_with(1));
        let settings_guard = state.settings.lock().unwrap();

        let resetter = {
            let state = Arc::clone(&state);
            std::thread::spawn(move || state.reset_court(0))
        };

        // The reset cannot read the warmup or touch the court until settings are released
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(state.get_court(0).unwrap().unwrap().remaining_ms(), None);

        drop(settings_guard);
        state.apply_settings(Settings::new(1, 3)).unwrap();
        let court = resetter.join().unwrap().unwrap().unwrap();
        assert!(court.remaining_ms() == Some(180_000) || court.remaining_ms() == Some(480_000));
        assert_eq!(court.remaining_ms(), state.get_court(0).unwrap().unwrap().remaining_ms());
    }

    #[test]
    fn test_reset_uses_current_warmup() {
        let state = state_with(2);
        state.apply_settings(Settings::new(2, 3)).unwrap();

        let court = state.reset_court(1).unwrap().unwrap();
        assert_eq!(court.remaining_ms(), Some(180_000));
        assert_eq!(state.get_last_action().0.as_deref(), Some("reset"));
    }

    #[test]
    fn test_tick_publishes_only_on_change() {
        let state = state_with(2);
        let mut rx = state.subscribe_courts();
        rx.mark_unchanged();

        assert!(!state.tick(250).unwrap());
        assert!(!rx.has_changed().unwrap());

        state.reset_court(0).unwrap();
        rx.mark_unchanged();
        assert!(state.tick(250).unwrap());
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot[0].remaining_ms(), Some(479_750));
    }

    #[test]
    fn test_apply_settings_query_falls_back_to_defaults() {
        let state = state_with(4);
        let query = SettingsQuery {
            court_count: Some("2".to_string()),
            warmup_time: Some("nope".to_string()),
        };

        let settings = state.apply_settings_query(&query).unwrap();
        assert_eq!(settings, Settings::new(2, DEFAULT_WARMUP_MINUTES));
        assert_eq!(state.get_courts().unwrap().len(), 2);
        assert_eq!(state.get_settings().unwrap(), settings);
    }

    #[test]
    fn test_resize_keeps_running_timers() {
        let state = state_with(2);
        state.reset_court(1).unwrap();
        state.tick(1_000).unwrap();

        state.apply_settings(Settings::new(5, 10)).unwrap();
        let court = state.get_court(1).unwrap().unwrap();
        assert_eq!(court.remaining_ms(), Some(479_000));
    }
}
