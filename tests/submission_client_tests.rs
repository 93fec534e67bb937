mod common;

use std::time::Duration;

use donation_desk::{
    api::{
        HttpSubmissionClient, CONNECTIVITY_MESSAGE, SUBMISSION_FALLBACK_MESSAGE,
        SUBMISSION_SUCCESS_MESSAGE,
    },
    core::{Field, PricingConfig, Severity, WizardStep},
};
use serde_json::json;
use wiremock::{
    matchers::{header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

use common::{api_for, ready_team_wizard, ready_ticket_wizard};

fn body_text(request: &wiremock::Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

fn part(name: &str, value: &str) -> String {
    format!("name=\"{name}\"\r\n\r\n{value}\r\n")
}

#[tokio::test]
async fn ticket_donation_posts_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .and(header_exists("Idempotency-Key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Donation received",
            "donation": { "id": 41, "status": "pending" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let mut wizard = ready_ticket_wizard(3);
    let notification = wizard
        .submit(&client, &PricingConfig::default())
        .await
        .expect("submission attempted");

    assert_eq!(notification.severity, Severity::Success);
    assert_eq!(notification.message, SUBMISSION_SUCCESS_MESSAGE);
    assert_eq!(wizard.step(), WizardStep::Details);
    assert!(wizard.values().text(Field::FullName).is_empty());
    assert!(wizard.attachment().is_none());

    let requests = server.received_requests().await.expect("recording enabled");
    let body = body_text(&requests[0]);
    assert!(body.contains(&part("fullName", "Ana Horvat")));
    assert!(body.contains(&part("email", "ana@example.com")));
    assert!(body.contains(&part("tickets", "3")));
    assert!(body.contains(&part("amount", "6")));
    assert!(body.contains(&part("paymentLinkUsed", "https://revolut.me/parish")));
    assert!(body.contains("name=\"screenshot\"; filename=\"proof.png\""));
    assert!(body.contains("image/png"));
}

#[tokio::test]
async fn team_registration_sends_fee_inclusive_amount() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let mut wizard = ready_team_wizard();
    let notification = wizard
        .submit(&client, &PricingConfig::default())
        .await
        .expect("submission attempted");
    assert!(!notification.is_error());

    let requests = server.received_requests().await.expect("recording enabled");
    let body = body_text(&requests[0]);
    assert!(body.contains(&part("teamName", "Quizzards")));
    assert!(body.contains(&part("participatedBefore", "false")));
    assert!(body.contains(&part("amount", "40")));
    assert!(!body.contains("name=\"tickets\""));
}

#[tokio::test]
async fn server_rejection_is_shown_verbatim_and_answers_are_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Screenshot is too blurry" })),
        )
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let mut wizard = ready_ticket_wizard(2);
    let notification = wizard
        .submit(&client, &PricingConfig::default())
        .await
        .expect("submission attempted");

    assert!(notification.is_error());
    assert_eq!(notification.message, "Screenshot is too blurry");
    assert_eq!(wizard.last_error(), Some("Screenshot is too blurry"));
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.values().text(Field::FullName), "Ana Horvat");
    assert!(wizard.attachment().is_some());
}

#[tokio::test]
async fn error_without_message_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let mut wizard = ready_ticket_wizard(1);
    let notification = wizard
        .submit(&client, &PricingConfig::default())
        .await
        .expect("submission attempted");
    assert_eq!(notification.message, SUBMISSION_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn slow_backend_reports_connectivity_and_keeps_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let api = api_for(&server).with_timeouts(Duration::from_millis(200), Duration::from_millis(200));
    let client = HttpSubmissionClient::new(api);
    let mut wizard = ready_ticket_wizard(4);
    let notification = wizard
        .submit(&client, &PricingConfig::default())
        .await
        .expect("submission attempted");

    assert_eq!(notification.message, CONNECTIVITY_MESSAGE);
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.tickets().get(), 4);
    assert_eq!(wizard.values().text(Field::Location), "Zagreb");
}

#[tokio::test]
async fn retry_after_failure_reuses_idempotency_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "Busy" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let pricing = PricingConfig::default();
    let mut wizard = ready_ticket_wizard(2);
    let first = wizard.submit(&client, &pricing).await.expect("first attempt");
    assert!(first.is_error());
    let second = wizard.submit(&client, &pricing).await.expect("second attempt");
    assert!(!second.is_error());

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    let keys: Vec<String> = requests
        .iter()
        .map(|request| {
            request
                .headers
                .get("Idempotency-Key")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert!(!keys[0].is_empty());
    assert_eq!(keys[0], keys[1]);
}

#[tokio::test]
async fn incomplete_form_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = HttpSubmissionClient::new(api_for(&server));
    let mut wizard = ready_ticket_wizard(1);
    wizard.detach();
    assert!(wizard.submit(&client, &PricingConfig::default()).await.is_none());
}
