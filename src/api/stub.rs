//! Scripted in-memory stand-in for the remote analysis service, used by
//! controller tests. Mirrors the service's side effect of recording an alert
//! whenever a verdict comes back positive.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::client::AnalysisApi;
use super::models::{AudioVerdict, TextVerdict, ThreatAlert};

#[derive(Clone)]
pub enum Scripted<T: Clone> {
    Reply(T),
    /// Transport failure.
    Fail,
    /// Never resolves; models a request still in flight.
    Stall,
}

struct StubState {
    text_response: Scripted<TextVerdict>,
    audio_response: Scripted<AudioVerdict>,
    response_delay: Duration,
    alerts: Vec<ThreatAlert>,
    text_requests: Vec<String>,
    audio_requests: Vec<String>,
}

pub struct StubApi {
    state: Mutex<StubState>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StubState {
                text_response: Scripted::Reply(TextVerdict {
                    is_spam: false,
                    reason: "Message appears safe.".into(),
                    score: None,
                }),
                audio_response: Scripted::Reply(AudioVerdict {
                    is_scam: false,
                    is_deepfake: false,
                    reason: vec![],
                    transcript_score: None,
                    voice_score: None,
                }),
                response_delay: Duration::ZERO,
                alerts: Vec::new(),
                text_requests: Vec::new(),
                audio_requests: Vec::new(),
            }),
        }
    }

    pub async fn script_text(&self, response: Scripted<TextVerdict>) {
        self.state.lock().await.text_response = response;
    }

    pub async fn script_audio(&self, response: Scripted<AudioVerdict>) {
        self.state.lock().await.audio_response = response;
    }

    /// Delay applied to analyze responses, for racing verdicts against
    /// session teardown.
    pub async fn set_response_delay(&self, delay: Duration) {
        self.state.lock().await.response_delay = delay;
    }

    pub async fn text_requests(&self) -> Vec<String> {
        self.state.lock().await.text_requests.clone()
    }

    pub async fn audio_requests(&self) -> Vec<String> {
        self.state.lock().await.audio_requests.clone()
    }

    pub async fn alert_count(&self) -> usize {
        self.state.lock().await.alerts.len()
    }

    fn record_alert(state: &mut StubState, alert_type: &str, content: &str, reason: String) {
        state.alerts.push(ThreatAlert {
            alert_type: alert_type.into(),
            reason,
            timestamp: Utc::now().to_rfc3339(),
            id: Some(state.alerts.len() as u64 + 1),
            content: Some(content.into()),
            severity: Some("high".into()),
            status: Some("new".into()),
        });
    }
}

#[async_trait]
impl AnalysisApi for StubApi {
    async fn analyze_text(&self, text: &str) -> Result<TextVerdict> {
        let (scripted, delay) = {
            let mut state = self.state.lock().await;
            state.text_requests.push(text.to_string());
            (state.text_response.clone(), state.response_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match scripted {
            Scripted::Reply(verdict) => {
                if verdict.is_spam {
                    let mut state = self.state.lock().await;
                    Self::record_alert(&mut state, "text", text, verdict.reason.clone());
                }
                Ok(verdict)
            }
            Scripted::Fail => Err(anyhow!("stubbed transport failure")),
            Scripted::Stall => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    async fn analyze_audio(&self, transcript: &str) -> Result<AudioVerdict> {
        let (scripted, delay) = {
            let mut state = self.state.lock().await;
            state.audio_requests.push(transcript.to_string());
            (state.audio_response.clone(), state.response_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match scripted {
            Scripted::Reply(verdict) => {
                if verdict.is_scam || verdict.is_deepfake {
                    let mut state = self.state.lock().await;
                    Self::record_alert(&mut state, "call", transcript, verdict.reason.join(", "));
                }
                Ok(verdict)
            }
            Scripted::Fail => Err(anyhow!("stubbed transport failure")),
            Scripted::Stall => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    async fn list_alerts(&self) -> Result<Vec<ThreatAlert>> {
        Ok(self.state.lock().await.alerts.clone())
    }

    async fn clear_alerts(&self) -> Result<()> {
        self.state.lock().await.alerts.clear();
        Ok(())
    }
}
