pub mod api;
pub mod call;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod messages;
pub mod speech;

use std::sync::Arc;

use api::{AnalysisApi, AnalysisClient};
use call::CallController;
use config::ShieldSettings;
use dashboard::DashboardController;
use events::EventBus;
use messages::MessageController;
use speech::SpeechPlayer;

/// Everything the demo UI talks to: one controller per screen plus the
/// shared event bus. Controllers are cheap clones over shared state.
pub struct ShieldApp {
    pub bus: EventBus,
    pub calls: CallController,
    pub messages: MessageController,
    pub dashboard: DashboardController,
}

impl ShieldApp {
    pub fn new(settings: &ShieldSettings) -> Self {
        let api: Arc<dyn AnalysisApi> = Arc::new(AnalysisClient::new(&settings.api_base_url));
        Self::with_api(api, settings)
    }

    pub fn with_api(api: Arc<dyn AnalysisApi>, settings: &ShieldSettings) -> Self {
        let bus = EventBus::default();
        let dashboard =
            DashboardController::new(api.clone(), bus.clone(), settings.dashboard_poll_interval());
        let calls = CallController::new(
            api.clone(),
            bus.clone(),
            dashboard.clone(),
            SpeechPlayer::new(),
            settings.analysis_delay(),
        );
        let messages = MessageController::new(api, bus.clone(), dashboard.clone());

        Self {
            bus,
            calls,
            messages,
            dashboard,
        }
    }
}
