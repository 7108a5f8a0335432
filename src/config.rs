use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldSettings {
    /// Base path of the remote analysis service, no trailing slash.
    pub api_base_url: String,
    /// Caregiver dashboard poll cadence.
    pub dashboard_poll_secs: u64,
    /// Delay before an untrusted call's transcript is submitted for analysis.
    /// Models transcription/inference latency and keeps the "analyzing"
    /// affordance visible for a moment.
    pub analysis_delay_ms: u64,
}

impl Default for ShieldSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".into(),
            dashboard_poll_secs: 5,
            analysis_delay_ms: 2000,
        }
    }
}

impl ShieldSettings {
    pub fn dashboard_poll_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_poll_secs)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ShieldSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ShieldSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ShieldSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: ShieldSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &ShieldSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
