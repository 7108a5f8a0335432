use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::{models::TextVerdict, AnalysisApi},
    dashboard::DashboardController,
    events::{EventBus, UiEvent},
};

/// One rendered SMS. Text is immutable; the verdict attaches once analysis
/// completes (never on a transport failure, leaving the bubble in its
/// default safe-looking state).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBubble {
    pub id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
    pub verdict: Option<TextVerdict>,
}

impl MessageBubble {
    pub fn is_flagged(&self) -> bool {
        matches!(&self.verdict, Some(v) if v.is_spam)
    }
}

/// Ingestion pipeline for simulated SMS traffic: render the bubble
/// immediately (optimistic UI), analyze in the background, flag on a spam
/// verdict. Bubbles accumulate for the screen's lifetime.
#[derive(Clone)]
pub struct MessageController {
    bubbles: Arc<Mutex<Vec<MessageBubble>>>,
    api: Arc<dyn AnalysisApi>,
    bus: EventBus,
    dashboard: DashboardController,
}

impl MessageController {
    pub fn new(api: Arc<dyn AnalysisApi>, bus: EventBus, dashboard: DashboardController) -> Self {
        Self {
            bubbles: Arc::new(Mutex::new(Vec::new())),
            api,
            bus,
            dashboard,
        }
    }

    pub async fn bubbles(&self) -> Vec<MessageBubble> {
        self.bubbles.lock().await.clone()
    }

    /// Screen teardown: drop the accumulated bubble list.
    pub async fn reset(&self) {
        self.bubbles.lock().await.clear();
    }

    /// Render an incoming message and submit it for analysis. The bubble is
    /// visible before the verdict is known.
    pub async fn ingest(&self, text: &str) -> Result<MessageBubble> {
        if text.trim().is_empty() {
            return Err(anyhow!("message text is empty"));
        }

        let bubble = MessageBubble {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            received_at: Utc::now(),
            verdict: None,
        };

        self.bubbles.lock().await.push(bubble.clone());
        self.bus
            .publish(UiEvent::MessageReceived(bubble.clone()));
        info!("Message ingested ({} chars)", bubble.text.len());

        let controller = self.clone();
        let bubble_id = bubble.id.clone();
        let body = bubble.text.clone();
        tokio::spawn(async move {
            match controller.api.analyze_text(&body).await {
                Ok(verdict) => controller.apply_verdict(&bubble_id, verdict).await,
                // No retry and no fabricated alert; the bubble stays unanalyzed
                Err(e) => error!("Message analysis failed: {e:#}"),
            }
        });

        Ok(bubble)
    }

    async fn apply_verdict(&self, bubble_id: &str, verdict: TextVerdict) {
        let flagged_reason = {
            let mut bubbles = self.bubbles.lock().await;
            let Some(bubble) = bubbles.iter_mut().find(|b| b.id == bubble_id) else {
                debug!("Verdict for bubble {bubble_id} arrived after the list was reset");
                return;
            };
            let reason = verdict.is_spam.then(|| verdict.reason.clone());
            bubble.verdict = Some(verdict);
            reason
        };

        if let Some(reason) = flagged_reason {
            self.bus.publish(UiEvent::MessageFlagged {
                bubble_id: bubble_id.to_string(),
                reason,
            });
            self.dashboard.refresh().await;
        }
    }
}
