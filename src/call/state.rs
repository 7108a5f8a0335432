use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CallStatus {
    /// No session; the controller outlives individual calls.
    Idle,
    Ringing,
    Active,
    Ended,
}

impl Default for CallStatus {
    fn default() -> Self {
        CallStatus::Idle
    }
}

/// Classification attached to a live session when the service flags the
/// call. Only ever set while the session is not `Ended`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreatReport {
    pub is_scam: bool,
    pub is_deepfake: bool,
    /// Reasons in the order the service produced them.
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallState {
    pub status: CallStatus,
    pub session_id: Option<String>,
    pub caller: String,
    pub transcript: String,
    pub trusted_caller: bool,
    pub elapsed_seconds: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub threat: Option<ThreatReport>,
}

impl CallState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale reset into a fresh ringing session; any leftovers from the
    /// previous call are discarded.
    pub fn begin_session(
        &mut self,
        session_id: String,
        caller: String,
        transcript: String,
        trusted_caller: bool,
    ) {
        *self = Self {
            status: CallStatus::Ringing,
            session_id: Some(session_id),
            caller,
            transcript,
            trusted_caller,
            elapsed_seconds: 0,
            started_at: None,
            threat: None,
        };
    }

    /// Formatted `mm:ss` status display.
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
