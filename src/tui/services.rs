use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{ApiError, CampaignApi, HttpCampaignApi, Identity, SessionAuth};
use crate::core::submission::SubmissionGateway;

use super::events::AppEvent;

/// Centralized handle to the backend.
///
/// Created once at startup and shared by the views. Everything here is
/// cheap to clone into spawned tasks.
pub struct Services {
    pub api: Arc<dyn CampaignApi>,
    pub auth: Arc<SessionAuth>,
    pub gateway: Arc<SubmissionGateway>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP client and session from config.
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Result<Self, ApiError> {
        let auth = Arc::new(session_from_config(config));
        let api: Arc<dyn CampaignApi> = Arc::new(HttpCampaignApi::new(&config.api, auth.clone())?);
        log::info!(
            "Campaign API at {} ({})",
            config.api.base_url,
            if auth.is_signed_in() { "signed in" } else { "signed out" }
        );
        Ok(Self::with_api(api, auth, event_tx))
    }

    /// Assemble services around an existing API implementation.
    pub fn with_api(
        api: Arc<dyn CampaignApi>,
        auth: Arc<SessionAuth>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let gateway = Arc::new(SubmissionGateway::new(api.clone()));
        Self {
            api,
            auth,
            gateway,
            event_tx,
        }
    }
}

fn session_from_config(config: &AppConfig) -> SessionAuth {
    match &config.api.token {
        Some(token) => {
            let user = config.api.user_id.clone().unwrap_or_else(|| "operator".to_string());
            SessionAuth::signed_in(Identity::new(user, token.clone()))
        }
        None => SessionAuth::signed_out(),
    }
}
