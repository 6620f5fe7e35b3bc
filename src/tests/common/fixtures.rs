//! Test Fixtures

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::ApiConfig;
use crate::core::api::{HttpCampaignApi, Identity, SessionAuth};
use crate::core::campaign::wizard::{CampaignDraft, DraftField};

pub const TEST_TOKEN: &str = "tok_test_0123456789";

// =============================================================================
// Drafts
// =============================================================================

/// A draft with every required field filled in.
pub fn complete_draft() -> CampaignDraft {
    let mut draft = CampaignDraft::new();
    draft.set_text(DraftField::Name, "Clinic Generator");
    draft.set_text(DraftField::Category, "Health");
    draft.set_text(DraftField::Description, "Backup power for the village clinic");
    draft.set_text(DraftField::Target, "7500");
    draft.set_text(DraftField::Duration, "30");
    draft
}

// =============================================================================
// Wire payloads
// =============================================================================

/// A campaign as the API serializes it.
pub fn campaign_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "title": format!("Campaign {id}"),
        "description": "Help us",
        "category": "Disaster Relief",
        "goalAmount": 5000,
        "status": status,
        "createdAt": "2026-03-01T12:00:00Z",
        "image": ["https://cdn.example/img.png"],
        "video": [],
        "document": ["https://cdn.example/plan.pdf"]
    })
}

// =============================================================================
// Clients
// =============================================================================

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: format!("{base_url}/api/"),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

/// Client for `base_url` with a signed-in operator.
pub fn signed_in_api(base_url: &str) -> HttpCampaignApi {
    let auth = SessionAuth::signed_in(Identity::new("operator-1", TEST_TOKEN));
    HttpCampaignApi::new(&api_config(base_url), Arc::new(auth)).expect("valid test base URL")
}

/// Client for `base_url` with nobody signed in.
pub fn anonymous_api(base_url: &str) -> HttpCampaignApi {
    HttpCampaignApi::new(&api_config(base_url), Arc::new(SessionAuth::signed_out())).expect("valid test base URL")
}
