use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    api::AnalysisApi,
    dashboard::DashboardController,
    events::{EventBus, UiEvent},
    speech::SpeechPlayer,
};

use super::state::{CallState, CallStatus, ThreatReport};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CallSnapshot {
    pub state: CallState,
    /// Formatted `mm:ss` status display.
    pub display: String,
}

/// Drives one simulated call at a time through
/// `Ringing -> Active -> Ended` (or `Ringing -> Ended` for a declined call).
///
/// Accepting an untrusted call schedules a single delayed analysis request;
/// trusted callers are never analyzed. Ending the call cancels the ticker,
/// the pending analysis, and speech playback synchronously — a verdict that
/// still arrives afterwards is discarded.
#[derive(Clone)]
pub struct CallController {
    state: Arc<Mutex<CallState>>,
    api: Arc<dyn AnalysisApi>,
    bus: EventBus,
    dashboard: DashboardController,
    speech: SpeechPlayer,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    session_token: Arc<Mutex<Option<CancellationToken>>>,
    tick_interval: Duration,
    analysis_delay: Duration,
}

impl CallController {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        bus: EventBus,
        dashboard: DashboardController,
        speech: SpeechPlayer,
        analysis_delay: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(CallState::new())),
            api,
            bus,
            dashboard,
            speech,
            ticker: Arc::new(Mutex::new(None)),
            session_token: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
            analysis_delay,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub async fn snapshot(&self) -> CallSnapshot {
        let state = self.state.lock().await.clone();
        snapshot_of(state)
    }

    /// Simulate an incoming call. Tears down whatever call came before and
    /// resets the session wholesale to `Ringing`.
    pub async fn start(
        &self,
        caller: &str,
        transcript: &str,
        trusted_caller: bool,
    ) -> Result<CallSnapshot> {
        if caller.trim().is_empty() {
            return Err(anyhow!("caller must not be empty"));
        }
        if transcript.trim().is_empty() {
            return Err(anyhow!("transcript must not be empty"));
        }

        self.end().await?;

        let session_id = Uuid::new_v4().to_string();
        info!("Incoming call from '{caller}' (session {session_id})");

        *self.session_token.lock().await = Some(CancellationToken::new());

        let snapshot = {
            let mut state = self.state.lock().await;
            state.begin_session(
                session_id,
                caller.to_string(),
                transcript.to_string(),
                trusted_caller,
            );
            snapshot_of(state.clone())
        };

        self.bus
            .publish(UiEvent::CallStateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Answer the ringing call: start the elapsed ticker, play the caller's
    /// voice, and — for untrusted callers only — schedule the delayed
    /// analysis of the transcript.
    pub async fn accept(&self) -> Result<CallSnapshot> {
        let (session_id, transcript, trusted) = {
            let mut state = self.state.lock().await;
            if state.status != CallStatus::Ringing {
                return Err(anyhow!("no ringing call to accept"));
            }
            state.status = CallStatus::Active;
            state.started_at = Some(chrono::Utc::now());
            // Playback starts under the state lock; end() flips the status
            // under this lock and stops playback afterwards, so speech can
            // never outlive the session.
            self.speech.speak(&state.transcript, state.trusted_caller);
            (
                state.session_id.clone().unwrap_or_default(),
                state.transcript.clone(),
                state.trusted_caller,
            )
        };

        self.spawn_ticker().await;

        if !trusted {
            self.bus.publish(UiEvent::CallAnalyzing);
            self.schedule_analysis(session_id, transcript).await;
        } else {
            debug!("Trusted caller; skipping analysis");
        }

        let snapshot = self.snapshot().await;
        self.bus
            .publish(UiEvent::CallStateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Hang up. Valid from `Ringing` (declined) and `Active`; calling it on
    /// an already-ended or idle session is a no-op. Cleanup never waits on
    /// the delayed analysis task.
    pub async fn end(&self) -> Result<()> {
        if let Some(token) = self.session_token.lock().await.take() {
            token.cancel();
        }
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }

        let snapshot = {
            let mut state = self.state.lock().await;
            match state.status {
                CallStatus::Ringing | CallStatus::Active => {
                    state.status = CallStatus::Ended;
                    Some(snapshot_of(state.clone()))
                }
                CallStatus::Idle | CallStatus::Ended => None,
            }
        };

        // Stop playback only after the status flip: a concurrent accept()
        // speaks while holding the state lock, so it is ordered before this.
        self.speech.stop();

        let Some(snapshot) = snapshot else {
            return Ok(());
        };

        info!("Call ended after {}", snapshot.display);
        self.bus.publish(UiEvent::CallStateChanged(snapshot));
        Ok(())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let bus = self.bus.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // Consume the immediate first tick so the count starts at zero
            interval.tick().await;
            loop {
                interval.tick().await;

                let tick = {
                    let mut guard = state.lock().await;
                    if guard.status != CallStatus::Active {
                        break;
                    }
                    guard.elapsed_seconds += 1;
                    (guard.elapsed_seconds, guard.display())
                };

                bus.publish(UiEvent::CallTick {
                    elapsed_seconds: tick.0,
                    display: tick.1,
                });
            }
        });

        *ticker_guard = Some(handle);
    }

    /// One-shot analysis request after the configured delay (models
    /// transcription/inference latency). The delay races the session token;
    /// the response is additionally liveness-checked, since a request
    /// already in flight can outlive the call.
    async fn schedule_analysis(&self, session_id: String, transcript: String) {
        let token = match self.session_token.lock().await.as_ref() {
            Some(token) => token.clone(),
            None => return,
        };
        let controller = self.clone();
        let delay = self.analysis_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Call ended before analysis was issued (session {session_id})");
                    return;
                }
                _ = time::sleep(delay) => {}
            }

            match controller.api.analyze_audio(&transcript).await {
                Ok(verdict) => {
                    let report = ThreatReport {
                        is_scam: verdict.is_scam,
                        is_deepfake: verdict.is_deepfake,
                        reasons: verdict.reason,
                    };
                    controller.apply_report(&session_id, report).await;
                }
                Err(e) => error!("Call analysis failed: {e:#}"),
            }
        });
    }

    /// Attach a threat report to the session it was requested for — iff that
    /// session is still active. Late results after `end()` (or for a newer
    /// session) are dropped without touching any state.
    async fn apply_report(&self, session_id: &str, report: ThreatReport) {
        let flagged = {
            let mut state = self.state.lock().await;
            if state.status != CallStatus::Active
                || state.session_id.as_deref() != Some(session_id)
            {
                debug!("Discarding stale analysis result for session {session_id}");
                return;
            }
            if !(report.is_scam || report.is_deepfake) {
                debug!("Call verdict clean for session {session_id}");
                return;
            }
            state.threat = Some(report.clone());
            report
        };

        let headline = flagged.reasons.join(" ");
        self.bus.publish(UiEvent::CallThreat {
            report: flagged,
            headline,
        });
        self.dashboard.refresh().await;
    }
}

fn snapshot_of(state: CallState) -> CallSnapshot {
    CallSnapshot {
        display: state.display(),
        state,
    }
}
