use serde::{Deserialize, Serialize};

/// Verdict for one SMS body from `POST /analyze/text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextVerdict {
    pub is_spam: bool,
    #[serde(default)]
    pub reason: String,
    /// Classifier confidence; mirrored for display, never branched on.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Verdict for one call transcript from `POST /analyze/audio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioVerdict {
    pub is_scam: bool,
    pub is_deepfake: bool,
    /// Reasons in the order the service produced them.
    #[serde(default)]
    pub reason: Vec<String>,
    #[serde(default)]
    pub transcript_score: Option<f64>,
    #[serde(default)]
    pub voice_score: Option<f64>,
}

/// One caregiver alert as recorded by the remote service. Read-only on this
/// side: the displayed list is always a snapshot of the last successful poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub reason: String,
    /// ISO-8601 string as the service emits it (no timezone suffix
    /// guaranteed), kept opaque rather than parsed.
    pub timestamp: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextAnalysisRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AudioAnalysisRequest<'a> {
    pub transcript: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_verdict_tolerates_minimal_body() {
        let verdict: TextVerdict = serde_json::from_str(r#"{"is_spam": false}"#).unwrap();
        assert!(!verdict.is_spam);
        assert!(verdict.reason.is_empty());
        assert!(verdict.score.is_none());
    }

    #[test]
    fn audio_verdict_parses_full_body() {
        let body = r#"{
            "is_scam": true,
            "is_deepfake": true,
            "transcript_score": 0.98,
            "voice_score": 0.95,
            "reason": ["Emergency Scam Pattern (Grandparent Scam)", "Artificial Voice Detected"]
        }"#;
        let verdict: AudioVerdict = serde_json::from_str(body).unwrap();
        assert!(verdict.is_scam);
        assert_eq!(verdict.reason.len(), 2);
    }

    #[test]
    fn alert_parses_service_shape() {
        let body = r#"{
            "id": 1,
            "timestamp": "2024-05-01T12:30:00.123456",
            "type": "call",
            "content": "Grandma, I'm in jail!",
            "reason": "Emergency Scam Pattern",
            "severity": "high",
            "status": "new"
        }"#;
        let alert: ThreatAlert = serde_json::from_str(body).unwrap();
        assert_eq!(alert.alert_type, "call");
        assert_eq!(alert.timestamp, "2024-05-01T12:30:00.123456");
    }
}
