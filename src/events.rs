use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    api::models::ThreatAlert,
    call::{CallSnapshot, ThreatReport},
    messages::MessageBubble,
};

/// Events the UI layer renders. Screen painting itself is out of scope;
/// subscribers (the demo binary, tests) decide what to do with these.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum UiEvent {
    CallStateChanged(CallSnapshot),
    #[serde(rename_all = "camelCase")]
    CallTick {
        elapsed_seconds: u64,
        /// Formatted `mm:ss` status display.
        display: String,
    },
    /// Shown while an untrusted call waits on the delayed analysis.
    CallAnalyzing,
    #[serde(rename_all = "camelCase")]
    CallThreat {
        report: ThreatReport,
        /// Reasons joined in order, space-separated, for the alert banner.
        headline: String,
    },
    MessageReceived(MessageBubble),
    #[serde(rename_all = "camelCase")]
    MessageFlagged {
        bubble_id: String,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    DashboardUpdated {
        threat_count: usize,
        alerts: Vec<ThreatAlert>,
        /// True when the service reports no active threats (empty-state render).
        empty: bool,
    },
}

/// Broadcast fanout for [`UiEvent`]s. Publishing never blocks and never
/// fails: a send with no live subscribers is simply dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: UiEvent) {
        // Err means no receivers are currently subscribed; that's fine.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
