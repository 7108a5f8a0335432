use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    api::{models::ThreatAlert, AnalysisApi},
    events::{EventBus, UiEvent},
};

/// What the caregiver screen shows: always a wholesale copy of the last
/// successful poll, never a partial merge.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub threat_count: usize,
    pub alerts: Vec<ThreatAlert>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Caregiver dashboard: aggregates alerts recorded by the remote service.
/// Refreshes on a fixed interval and whenever a session reports a threat.
#[derive(Clone)]
pub struct DashboardController {
    api: Arc<dyn AnalysisApi>,
    bus: EventBus,
    snapshot: Arc<Mutex<DashboardSnapshot>>,
    poller: Arc<Mutex<Option<JoinHandle<()>>>>,
    poll_interval: Duration,
}

impl DashboardController {
    pub fn new(api: Arc<dyn AnalysisApi>, bus: EventBus, poll_interval: Duration) -> Self {
        Self {
            api,
            bus,
            snapshot: Arc::new(Mutex::new(DashboardSnapshot::default())),
            poller: Arc::new(Mutex::new(None)),
            poll_interval,
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.lock().await.clone()
    }

    /// Fetch the current alert list and replace the snapshot wholesale.
    /// A failed fetch keeps the last-known state on screen. Concurrent
    /// refreshes apply last-response-wins; there is no sequencing token, so
    /// a slow poll can briefly revert a newer count (accepted for the demo).
    pub async fn refresh(&self) {
        match self.api.list_alerts().await {
            Ok(alerts) => {
                let snapshot = DashboardSnapshot {
                    threat_count: alerts.len(),
                    alerts,
                    last_updated: Some(Utc::now()),
                };
                *self.snapshot.lock().await = snapshot.clone();
                self.bus.publish(UiEvent::DashboardUpdated {
                    threat_count: snapshot.threat_count,
                    empty: snapshot.alerts.is_empty(),
                    alerts: snapshot.alerts,
                });
            }
            Err(e) => {
                error!("Dashboard refresh failed: {e:#}");
            }
        }
    }

    /// Ask the service to drop all alerts, then resynchronize.
    pub async fn clear(&self) -> Result<()> {
        self.api.clear_alerts().await?;
        self.refresh().await;
        Ok(())
    }

    /// Start the autonomous poll loop: one eager refresh now, then one per
    /// interval, independent of any session activity.
    pub async fn start_polling(&self) {
        let mut guard = self.poller.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let interval = self.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            loop {
                // First tick fires immediately, giving the eager startup refresh
                ticker.tick().await;
                controller.refresh().await;
            }
        });

        info!("Dashboard polling every {:?}", self.poll_interval);
        *guard = Some(handle);
    }

    pub async fn stop_polling(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
        }
    }
}
