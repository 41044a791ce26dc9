//! Bounded, newest-first buffers for alerts, analyses and operator notices.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ALERT_HISTORY_CAP: usize = 5;
pub const ANALYSIS_HISTORY_CAP: usize = 10;
pub const NOTICE_HISTORY_CAP: usize = 10;

/// Newest-first buffer that silently evicts its oldest entry once full.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    cap: usize,
}

impl<T> BoundedHistory<T> {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.cap == 0 {
            return;
        }
        if self.entries.len() == self.cap {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> BoundedHistory<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    FloodWarning,
}

/// Retained record of a FLOOD_WARNING decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub kind: AlertKind,
    pub message: String,
}

pub type AlertHistory = BoundedHistory<Alert>;

impl AlertHistory {
    pub fn alerts() -> Self {
        Self::with_cap(ALERT_HISTORY_CAP)
    }
}

/// Non-blocking operator notice, raised whenever data falls back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
