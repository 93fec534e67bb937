#![allow(dead_code)]

use std::sync::Mutex;

use donation_desk::{
    api::ApiClient,
    config::ConfigManager,
    core::{AttachedFile, DonationWizard, Field, FormVariant, TicketCount},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use wiremock::MockServer;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Config manager rooted in a fresh temporary directory.
pub fn temp_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

/// Client pointed at the mock server's `/api` prefix.
pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri())).expect("mock server url")
}

/// Base URL nothing listens on.
pub fn unreachable_api() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9/api").expect("static url")
}

pub fn screenshot() -> AttachedFile {
    AttachedFile::from_bytes("proof.png", vec![0x89, 0x50, 0x4e, 0x47]).expect("png attachment")
}

/// Ticket donation filled in up to the review step.
pub fn ready_ticket_wizard(tickets: u32) -> DonationWizard {
    let mut wizard = DonationWizard::new(FormVariant::TicketDonation);
    wizard.set_text(Field::FullName, "Ana Horvat");
    wizard.set_text(Field::Email, "ana@example.com");
    wizard.set_text(Field::Phone, "0911234567");
    wizard.set_text(Field::Location, "Zagreb");
    wizard.set_tickets(TicketCount::new(tickets));
    assert!(wizard.advance(), "details step should be complete");
    wizard.set_text(Field::PaymentLink, "https://revolut.me/parish");
    wizard.attach(screenshot());
    assert!(wizard.advance(), "payment step should be complete");
    wizard
}

/// Team registration filled in on its final (payment) step.
pub fn ready_team_wizard() -> DonationWizard {
    let mut wizard = DonationWizard::new(FormVariant::TeamRegistration);
    wizard.set_text(Field::TeamName, "Quizzards");
    wizard.set_text(Field::ParticipantOne, "Ivan Kovač");
    wizard.set_text(Field::ParticipantTwo, "Marta Babić");
    wizard.set_text(Field::Email, "team@example.com");
    wizard.set_text(Field::Phone, "0921234567");
    wizard.set_text(Field::Address, "Ilica 1");
    wizard.set_text(Field::Zone, "Centar");
    wizard.set_text(Field::Diocese, "Zagreb");
    assert!(wizard.advance(), "details step should be complete");
    wizard.set_text(Field::PaymentLink, "https://paypal.me/parish");
    wizard.attach(screenshot());
    wizard
}
