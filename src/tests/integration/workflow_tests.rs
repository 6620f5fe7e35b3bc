//! End-to-end flows through the real HTTP client: wizard draft to created
//! campaign, moderation of the pending list and incremental search.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::SearchConfig;
use crate::core::api::{CampaignApi, ErrorKind};
use crate::core::campaign::wizard::{AssetRef, CampaignWizard, DraftField, FieldValue, VideoSource};
use crate::core::campaign::{CampaignId, CampaignStatus};
use crate::core::review::{ReviewClient, ReviewError};
use crate::core::search::SearchClient;
use crate::core::submission::{SubmissionError, SubmissionGateway};
use crate::tests::common::{anonymous_api, campaign_json, complete_draft, signed_in_api};

async fn mount_pending(server: &MockServer, ids: &[&str]) {
    let body: Vec<_> = ids.iter().map(|id| campaign_json(id, "pending")).collect();
    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_wizard_draft_submits_with_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/campaigns"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "created-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("clinic.jpg");
    let plan = dir.path().join("plan.pdf");
    std::fs::write(&image, b"JPEGBYTES").unwrap();
    std::fs::write(&plan, b"PLANBYTES").unwrap();

    let mut wizard = CampaignWizard::new();
    *wizard.draft_mut() = complete_draft();
    let draft = wizard.draft_mut();
    draft.set_field(DraftField::Image, FieldValue::Asset(AssetRef::file(&image)));
    draft.set_field(DraftField::Documents, FieldValue::Assets(vec![AssetRef::file(&plan)]));
    draft.set_field(
        DraftField::Video,
        FieldValue::Video(VideoSource::from_text("https://video.example/clinic")),
    );

    let gateway = SubmissionGateway::new(Arc::new(signed_in_api(&server.uri())));
    let id = gateway.submit(wizard.draft()).await.unwrap();
    assert_eq!(id, CampaignId::new("created-1"));
    assert!(!gateway.is_submitting());

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("filename=\"clinic.jpg\""));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains("JPEGBYTES"));
    assert!(body.contains("filename=\"plan.pdf\""));
    assert!(body.contains("https://video.example/clinic"));
}

#[tokio::test]
async fn test_missing_asset_fails_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut draft = complete_draft();
    draft.set_field(
        DraftField::Image,
        FieldValue::Asset(AssetRef::file("/definitely/not/here.png")),
    );

    let gateway = SubmissionGateway::new(Arc::new(signed_in_api(&server.uri())));
    let err = gateway.submit(&draft).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Asset { .. }));
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_server_validation_leaves_draft_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/campaigns"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "target too large"})))
        .mount(&server)
        .await;

    let draft = complete_draft();
    let before = draft.clone();
    let gateway = SubmissionGateway::new(Arc::new(signed_in_api(&server.uri())));

    let err = gateway.submit(&draft).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("target too large"));
    assert_eq!(draft, before);
}

#[tokio::test]
async fn test_signed_out_submission_is_auth_error() {
    let server = MockServer::start().await;
    let gateway = SubmissionGateway::new(Arc::new(anonymous_api(&server.uri())));

    let err = gateway.submit(&complete_draft()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Review
// ============================================================================

#[tokio::test]
async fn test_review_approve_then_reject() {
    let server = MockServer::start().await;
    mount_pending(&server, &["c1", "c2"]).await;
    Mock::given(method("PATCH"))
        .and(path("/api/campaigns/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(campaign_json("c1", "active")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/campaigns/c2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = ReviewClient::new(Arc::new(signed_in_api(&server.uri())));
    assert_eq!(client.list_pending().await.unwrap().len(), 2);

    let c1 = CampaignId::new("c1");
    let c2 = CampaignId::new("c2");
    client.select(&c2).unwrap();

    client.approve(&c1).await.unwrap();
    assert_eq!(client.get(&c1).unwrap().status, CampaignStatus::Active);

    client.reject(&c2).await.unwrap();
    assert!(client.get(&c2).is_none());
    assert!(client.selected().is_none());
    assert_eq!(client.campaigns().len(), 1);
}

#[tokio::test]
async fn test_review_drops_campaign_deleted_elsewhere() {
    let server = MockServer::start().await;
    mount_pending(&server, &["gone"]).await;
    Mock::given(method("PATCH"))
        .and(path("/api/campaigns/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "campaign not found"})))
        .mount(&server)
        .await;

    let mut client = ReviewClient::new(Arc::new(signed_in_api(&server.uri())));
    client.list_pending().await.unwrap();
    let id = CampaignId::new("gone");
    client.select(&id).unwrap();

    let err = client.approve(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(client.campaigns().is_empty());
    assert!(client.selected_id().is_none());
    assert!(!client.is_in_flight(&id));
}

#[tokio::test]
async fn test_review_requires_sign_in() {
    let server = MockServer::start().await;
    mount_pending(&server, &["c1"]).await;

    let mut client = ReviewClient::new(Arc::new(anonymous_api(&server.uri())));
    client.list_pending().await.unwrap();

    let err = client.reject(&CampaignId::new("c1")).await.unwrap_err();
    assert!(matches!(err, ReviewError::Api(_)));
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(client.campaigns().len(), 1);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_debounce_then_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns/search"))
        .and(query_param("q", "clinic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "a", "title": "Clinic A"},
            {"_id": "b", "title": "Clinic B"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = anonymous_api(&server.uri());
    let mut client = SearchClient::new(&SearchConfig::default());
    let start = Instant::now();

    for (i, prefix) in ["cl", "cli", "clin", "clini", "clinic"].iter().enumerate() {
        client.on_input(*prefix, start + Duration::from_millis(i as u64 * 50));
    }
    assert!(client.poll_due(start + Duration::from_millis(300)).is_none());

    let ticket = client
        .poll_due(start + Duration::from_millis(200 + 300))
        .expect("debounce elapsed");
    assert_eq!(ticket.term, "clinic");

    let response = ticket.execute(&api as &dyn CampaignApi).await;
    assert!(client.apply(response));
    assert_eq!(client.results().len(), 2);
    assert_eq!(client.results_term(), Some("clinic"));
}

#[tokio::test]
async fn test_single_character_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let api = anonymous_api(&server.uri());
    let mut client = SearchClient::new(&SearchConfig::default());
    let results = client.search_now("c", &api).await.unwrap();
    assert!(results.is_empty());
}
