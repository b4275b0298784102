//! Transient per-region operation status.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Screen region an action reports its progress into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRegion {
    Upload,
    Analysis,
    Training,
    SinglePrediction,
    BatchPrediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Current status of every region plus the last blocking notice.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    regions: HashMap<StatusRegion, StatusMessage>,
    alert: Option<String>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&mut self, region: StatusRegion, text: impl Into<String>) {
        self.set(region, StatusLevel::Loading, text.into());
    }

    pub fn success(&mut self, region: StatusRegion, text: impl Into<String>) {
        self.set(region, StatusLevel::Success, text.into());
    }

    pub fn error(&mut self, region: StatusRegion, text: impl Into<String>) {
        let text = text.into();
        warn!(?region, message = %text, "action failed");
        self.set(region, StatusLevel::Error, text);
    }

    pub fn clear(&mut self, region: StatusRegion) {
        self.regions.remove(&region);
    }

    pub fn get(&self, region: StatusRegion) -> Option<&StatusMessage> {
        self.regions.get(&region)
    }

    /// Record a blocking notice shown instead of running an action.
    pub fn alert(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(notice = %text, "action blocked");
        self.alert = Some(text);
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Take the pending notice, leaving none behind.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    fn set(&mut self, region: StatusRegion, level: StatusLevel, text: String) {
        debug!(?region, ?level, %text, "status updated");
        self.regions.insert(region, StatusMessage { level, text });
    }
}
