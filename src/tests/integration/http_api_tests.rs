//! `HttpCampaignApi` wire behavior: paths, query strings, bodies, auth
//! headers and status-code mapping.

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::api::{AssetPart, CampaignApi, ErrorKind, NewCampaignRequest};
use crate::core::campaign::{CampaignId, CampaignStatus, Category};
use crate::tests::common::{anonymous_api, campaign_json, signed_in_api, TEST_TOKEN};

#[tokio::test]
async fn test_search_sends_term_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns/search"))
        .and(query_param("q", "water well"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "c1", "title": "Water Well", "category": "Health", "goalAmount": 900},
            {"_id": "c2", "title": "Well Repairs"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = anonymous_api(&server.uri()).search("water well").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].category, Some(Category::Health));
    assert_eq!(results[1].goal_amount, None);
}

#[tokio::test]
async fn test_list_pending_filters_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([campaign_json("c1", "pending")])))
        .expect(1)
        .mount(&server)
        .await;

    let campaigns = anonymous_api(&server.uri())
        .list_campaigns(CampaignStatus::Pending)
        .await
        .unwrap();
    assert_eq!(campaigns.len(), 1);
    let c = &campaigns[0];
    assert_eq!(c.id.as_str(), "c1");
    assert_eq!(c.category, Category::DisasterRelief);
    assert_eq!(c.goal_amount, 5000.0);
    assert!(c.created_at.is_some());
    assert_eq!(c.document.len(), 1);
}

#[tokio::test]
async fn test_update_status_patches_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/campaigns/c1"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({"status": "active"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(campaign_json("c1", "active")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = signed_in_api(&server.uri())
        .update_status(&CampaignId::new("c1"), CampaignStatus::Active)
        .await
        .unwrap();
    assert_eq!(updated.status, CampaignStatus::Active);
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/campaigns/c1"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    signed_in_api(&server.uri())
        .delete_campaign(&CampaignId::new("c1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_posts_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/campaigns"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "new-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = NewCampaignRequest {
        name: "Library Books".into(),
        category: Category::Education,
        description: "Stock the new library".into(),
        target: 3000.0,
        duration_days: 90,
        details: Some("Local suppliers only".into()),
        video_url: None,
        image: Some(AssetPart::new("cover.png", b"PNGDATA".to_vec())),
        video: None,
        documents: vec![AssetPart::new("budget.pdf", b"PDFDATA".to_vec())],
    };

    let id = signed_in_api(&server.uri()).create_campaign(request).await.unwrap();
    assert_eq!(id.as_str(), "new-42");

    let received = server.received_requests().await.unwrap();
    let req = &received[0];
    let content_type = req
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&req.body);
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("Library Books"));
    assert!(body.contains("name=\"category\""));
    assert!(body.contains("name=\"duration\""));
    assert!(body.contains("name=\"details\""));
    assert!(body.contains("filename=\"cover.png\""));
    assert!(body.contains("name=\"documents\"; filename=\"budget.pdf\""));
    assert!(body.contains("PDFDATA"));
}

#[tokio::test]
async fn test_protected_call_signed_out_never_dispatches() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = anonymous_api(&server.uri())
        .delete_campaign(&CampaignId::new("c1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[rstest]
#[case(400, json!({"message": "target must be positive"}), ErrorKind::Validation)]
#[case(422, json!({"errors": [{"message": "name is required"}]}), ErrorKind::Validation)]
#[case(401, json!({"error": "token expired"}), ErrorKind::Auth)]
#[case(403, json!({}), ErrorKind::Auth)]
#[case(404, json!({"message": "campaign not found"}), ErrorKind::NotFound)]
#[case(504, json!({}), ErrorKind::Network)]
#[case(500, json!({"message": "boom"}), ErrorKind::Other)]
#[tokio::test]
async fn test_status_codes_map_to_error_kinds(
    #[case] status: u16,
    #[case] body: serde_json::Value,
    #[case] expected: ErrorKind,
) {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/campaigns/c1"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;

    let err = signed_in_api(&server.uri())
        .update_status(&CampaignId::new("c1"), CampaignStatus::Active)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), expected, "status {status} mapped to {err:?}");
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "query too short"})))
        .mount(&server)
        .await;

    let err = anonymous_api(&server.uri()).search("ab").await.unwrap_err();
    assert!(err.to_string().contains("query too short"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // A freed port has nothing listening; pooled mock servers would still answer.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let uri = format!("http://127.0.0.1:{port}");

    let err = anonymous_api(&uri).search("health").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_transient());
}
