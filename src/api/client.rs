use anyhow::{Context, Result};
use async_trait::async_trait;

use super::models::{
    AudioAnalysisRequest, AudioVerdict, TextAnalysisRequest, TextVerdict, ThreatAlert,
};

/// The four operations the remote analysis service exposes. Controllers talk
/// to this trait so tests can substitute a scripted in-memory service.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn analyze_text(&self, text: &str) -> Result<TextVerdict>;
    async fn analyze_audio(&self, transcript: &str) -> Result<AudioVerdict>;
    async fn list_alerts(&self) -> Result<Vec<ThreatAlert>>;
    async fn clear_alerts(&self) -> Result<()>;
}

/// HTTP implementation over the remote service. Single-shot requests: no
/// retry and no timeout beyond reqwest's defaults; a transport failure or
/// non-2xx status surfaces as `Err` for the caller to log and drop.
pub struct AnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn analyze_text(&self, text: &str) -> Result<TextVerdict> {
        let response = self
            .client
            .post(self.url("/analyze/text"))
            .json(&TextAnalysisRequest { text })
            .send()
            .await
            .context("text analysis request failed")?
            .error_for_status()
            .context("text analysis returned an error status")?;

        response
            .json()
            .await
            .context("invalid text analysis response body")
    }

    async fn analyze_audio(&self, transcript: &str) -> Result<AudioVerdict> {
        let response = self
            .client
            .post(self.url("/analyze/audio"))
            .json(&AudioAnalysisRequest { transcript })
            .send()
            .await
            .context("audio analysis request failed")?
            .error_for_status()
            .context("audio analysis returned an error status")?;

        response
            .json()
            .await
            .context("invalid audio analysis response body")
    }

    async fn list_alerts(&self) -> Result<Vec<ThreatAlert>> {
        let response = self
            .client
            .get(self.url("/alerts"))
            .send()
            .await
            .context("alert list request failed")?
            .error_for_status()
            .context("alert list returned an error status")?;

        response.json().await.context("invalid alert list body")
    }

    async fn clear_alerts(&self) -> Result<()> {
        // Acknowledgement body is not consumed.
        self.client
            .post(self.url("/alerts/clear"))
            .send()
            .await
            .context("clear alerts request failed")?
            .error_for_status()
            .context("clear alerts returned an error status")?;
        Ok(())
    }
}
