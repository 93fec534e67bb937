mod common;

use donation_desk::{
    api::{AdminClient, AdminSession, AuthClient},
    domain::{PaymentLink, PaymentLinkDraft, RecordId, StatusUpdate, SubmissionStatus},
};
use serde_json::json;
use wiremock::{
    matchers::{bearer_token, body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use common::{api_for, screenshot};

const TOKEN: &str = "session-token-123";

fn admin_for(server: &MockServer) -> AdminClient {
    AdminClient::new(api_for(server), AdminSession::new("admin", TOKEN))
}

#[tokio::test]
async fn login_exchanges_credentials_for_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthClient::new(api_for(&server))
        .login("admin", "hunter2")
        .await
        .unwrap();
    assert_eq!(session.username(), "admin");
}

#[tokio::test]
async fn rejected_login_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = AuthClient::new(api_for(&server))
        .login("admin", "wrong")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message_or("fallback"), "Invalid credentials");
}

#[tokio::test]
async fn listing_sends_bearer_token_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/donations"))
        .and(bearer_token(TOKEN))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [
                { "id": 1, "fullName": "Ana Horvat", "email": "ana@example.com", "amount": "6.00", "status": "pending" },
                { "id": 2, "teamName": "Quizzards", "email": "team@example.com", "amount": 40, "status": "confirmed" }
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = admin_for(&server).list_submissions(100).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].display_name(), "Quizzards");
    assert_eq!(records[1].status, SubmissionStatus::Confirmed);
}

#[tokio::test]
async fn status_update_body_matches_backend_shape() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/donations/7/status"))
        .and(bearer_token(TOKEN))
        .and(body_json(json!({
            "status": "confirmed",
            "actualAmount": 6.0,
            "ticketsToAssign": 3,
            "ticketNumbers": "101, 102, 103"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let update = StatusUpdate {
        status: SubmissionStatus::Confirmed,
        actual_amount: Some(6.0),
        tickets_to_assign: Some(3),
        ticket_numbers: vec!["101".into(), "102".into(), "103".into()],
    };
    admin_for(&server)
        .update_status(&RecordId::new("7"), &update)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_and_export_hit_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/donations/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/donations/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,fullName\n1,Ana\n"))
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    admin.delete_submission(&RecordId::new("9")).await.unwrap();
    let csv = admin.export_csv().await.unwrap();
    assert_eq!(String::from_utf8(csv).unwrap(), "id,fullName\n1,Ana\n");
}

#[tokio::test]
async fn toggling_a_link_sends_flipped_flag() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/payment-links/3"))
        .and(body_json(json!({
            "name": "PayPal",
            "url": "https://paypal.me/parish",
            "isActive": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let link: PaymentLink = serde_json::from_value(json!({
        "id": 3, "name": "PayPal", "url": "https://paypal.me/parish", "isActive": true
    }))
    .unwrap();
    let active = admin_for(&server).toggle_link(&link).await.unwrap();
    assert!(!active);
}

#[tokio::test]
async fn creating_a_link_posts_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment-links"))
        .and(body_json(json!({
            "name": "Revolut",
            "url": "https://revolut.me/parish",
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = PaymentLinkDraft::new("Revolut", "https://revolut.me/parish");
    admin_for(&server).create_link(&draft).await.unwrap();
}

#[tokio::test]
async fn settings_round_trip_and_banner_upload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orgName": "Parish" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/upload-banner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "banners": [{ "url": "https://cdn.example/b1.png", "publicId": "b1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    let settings = admin.settings().await.unwrap();
    assert_eq!(settings.org_name, "Parish");

    let banners = admin.upload_banner(&screenshot()).await.unwrap();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].public_id, "b1");

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|request| request.url.path() == "/api/admin/upload-banner")
        .unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"banner\"; filename=\"proof.png\""));
}

#[tokio::test]
async fn expired_session_is_reported_as_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payment-links"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expired" })))
        .mount(&server)
        .await;

    let err = admin_for(&server).list_links().await.unwrap_err();
    assert!(err.is_unauthorized());
}
