//! Toast feedback: one active message at a time, auto-hidden after a
//! style-dependent duration.

use crate::config;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStyle {
    General,
    Success,
    Failure,
}

impl FeedbackStyle {
    /// How long a toast of this style stays visible
    pub fn duration(self) -> Duration {
        let secs = match self {
            FeedbackStyle::General => config::GENERAL_TOAST_SECS,
            FeedbackStyle::Success => config::SUCCESS_TOAST_SECS,
            FeedbackStyle::Failure => config::FAILURE_TOAST_SECS,
        };
        Duration::from_secs_f64(secs)
    }
}

/// A user-visible notification before it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub message: String,
    pub style: FeedbackStyle,
}

impl FeedbackEvent {
    pub fn general(message: impl Into<String>) -> Self {
        Self { message: message.into(), style: FeedbackStyle::General }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), style: FeedbackStyle::Success }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { message: message.into(), style: FeedbackStyle::Failure }
    }
}

/// The toast currently owned by the channel
#[derive(Debug, Clone)]
pub struct FeedbackState {
    pub visible: bool,
    pub message: String,
    pub style: FeedbackStyle,
    pub expires_at: Instant,
}

/// Past feedback, newest first in [`FeedbackChannel::history`]
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub at: DateTime<Local>,
    pub message: String,
    pub style: FeedbackStyle,
}

#[derive(Debug, Default)]
pub struct FeedbackChannel {
    current: Option<FeedbackState>,
    history: VecDeque<HistoryEntry>,
}

impl FeedbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `event`, replacing whatever toast was active
    pub fn raise(&mut self, event: FeedbackEvent, now: Instant) {
        tracing::debug!(style = ?event.style, "Feedback: {}", event.message);

        self.history.push_front(HistoryEntry {
            at: Local::now(),
            message: event.message.clone(),
            style: event.style,
        });
        self.history.truncate(config::FEEDBACK_HISTORY_LIMIT);

        self.current = Some(FeedbackState {
            visible: true,
            expires_at: now + event.style.duration(),
            message: event.message,
            style: event.style,
        });
    }

    /// Hide the toast once its duration has elapsed. Returns true if it was hidden now.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.current.as_mut() {
            Some(state) if state.visible && now >= state.expires_at => {
                state.visible = false;
                true
            }
            _ => false,
        }
    }

    /// Hide the toast early (user pressed Esc)
    pub fn dismiss(&mut self) {
        if let Some(state) = self.current.as_mut() {
            state.visible = false;
        }
    }

    /// The visible toast, if any
    pub fn active(&self) -> Option<&FeedbackState> {
        self.current.as_ref().filter(|s| s.visible)
    }

    /// Most recent toast, visible or not
    pub fn last(&self) -> Option<&FeedbackState> {
        self.current.as_ref()
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }
}
