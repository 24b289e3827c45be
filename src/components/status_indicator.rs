// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Save status, mode letter, and blocking alerts shown over the map

use crate::settings;
use chrono::Local;
use std::collections::VecDeque;

/// Persistence state shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Error,
}

impl SaveStatus {
    /// Text shown for this state
    pub fn text(self) -> &'static str {
        match self {
            SaveStatus::Saved => settings::text::SAVED,
            SaveStatus::Saving => settings::text::SAVING,
            SaveStatus::Error => settings::text::ERROR,
        }
    }
}

/// Status overlay state
///
/// Several saves can be outstanding at once; the indicator reads "saving"
/// until the last of them resolves.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    status: SaveStatus,
    pending_saves: usize,
    mode: char,
    last_saved: Option<String>,
    alerts: VecDeque<String>,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            status: SaveStatus::Saved,
            pending_saves: 0,
            mode: 'S',
            last_saved: None,
            alerts: VecDeque::new(),
        }
    }
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save state
    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Text for the current save state
    pub fn text(&self) -> &'static str {
        self.status.text()
    }

    /// Letter for the active mode or commit style
    pub fn mode(&self) -> char {
        self.mode
    }

    /// Show `letter` as the active mode
    pub fn set_mode(&mut self, letter: char) {
        self.mode = letter.to_ascii_uppercase();
    }

    /// Wall-clock time of the last completed save, e.g. "03:41 PM"
    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    /// A store call has started
    pub fn begin_save(&mut self) {
        self.pending_saves += 1;
        self.status = SaveStatus::Saving;
    }

    /// A store call has finished, successfully or not
    pub fn finish_save(&mut self, ok: bool) {
        self.pending_saves = self.pending_saves.saturating_sub(1);
        if !ok {
            self.status = SaveStatus::Error;
            return;
        }
        self.last_saved = Some(Local::now().format("%I:%M %p").to_string());
        if self.pending_saves == 0 && self.status != SaveStatus::Error {
            self.status = SaveStatus::Saved;
        }
    }

    /// A save that was called off before reaching the store
    pub fn abandon_save(&mut self) {
        self.pending_saves = self.pending_saves.saturating_sub(1);
        if self.pending_saves == 0 && self.status == SaveStatus::Saving {
            self.status = SaveStatus::Saved;
        }
    }

    /// Nothing is outstanding any more, whatever the count says
    pub fn settle(&mut self) {
        self.pending_saves = 0;
        if self.status == SaveStatus::Saving {
            self.status = SaveStatus::Saved;
        }
    }

    /// Queue a blocking notification for the user
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Alert raised");
        self.alerts.push_back(message);
    }

    /// Alerts not yet shown, oldest first
    pub fn take_alerts(&mut self) -> Vec<String> {
        self.alerts.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saving_until_last_save_resolves() {
        let mut status = StatusIndicator::new();
        status.begin_save();
        status.begin_save();
        assert_eq!(status.status(), SaveStatus::Saving);

        status.finish_save(true);
        assert_eq!(status.status(), SaveStatus::Saving);

        status.finish_save(true);
        assert_eq!(status.status(), SaveStatus::Saved);
        assert!(status.last_saved().is_some());
    }

    #[test]
    fn error_sticks_until_next_save_round() {
        let mut status = StatusIndicator::new();
        status.begin_save();
        status.begin_save();
        status.finish_save(false);
        status.finish_save(true);
        assert_eq!(status.status(), SaveStatus::Error);
        assert_eq!(status.text(), settings::text::ERROR);

        status.begin_save();
        status.finish_save(true);
        assert_eq!(status.status(), SaveStatus::Saved);
    }

    #[test]
    fn abandoned_and_dropped_saves_settle() {
        let mut status = StatusIndicator::new();
        status.begin_save();
        status.abandon_save();
        assert_eq!(status.status(), SaveStatus::Saved);
        assert!(status.last_saved().is_none());

        status.begin_save();
        status.begin_save();
        status.settle();
        assert_eq!(status.status(), SaveStatus::Saved);
    }

    #[test]
    fn alerts_drain_in_order() {
        let mut status = StatusIndicator::new();
        status.alert("first");
        status.alert("second");
        assert_eq!(status.take_alerts(), vec!["first", "second"]);
        assert!(status.take_alerts().is_empty());
    }
}
