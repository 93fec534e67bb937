mod common;

use std::time::Duration;

use donation_desk::{api::ApiClient, config::Config};

use common::temp_config_manager;

#[test]
fn missing_file_loads_defaults() {
    let manager = temp_config_manager();
    let config = manager.load().unwrap();
    assert_eq!(config.currency, "EUR");
    assert_eq!(config.submission_timeout(), Duration::from_secs(30));
    assert_eq!(config.reference_timeout(), Duration::from_secs(5));
    assert!(!manager.path().exists());
}

#[test]
fn saved_settings_survive_reload() {
    let manager = temp_config_manager();
    let mut config = Config::default();
    config.set_field("currency", "gbp").unwrap();
    config.set_field("submission-timeout", "45s").unwrap();
    config.set_field("export-dir", "/tmp/exports").unwrap();
    manager.save(&config).unwrap();

    let reloaded = manager.load().unwrap();
    assert_eq!(reloaded.currency, "GBP");
    assert_eq!(reloaded.submission_timeout_secs, 45);
    assert_eq!(
        reloaded.export_dir.as_deref(),
        Some(std::path::Path::new("/tmp/exports"))
    );

    let client = ApiClient::from_config(&reloaded).unwrap();
    assert_eq!(client.submission_timeout(), Duration::from_secs(45));
}

#[test]
fn invalid_values_leave_config_untouched() {
    let mut config = Config::default();
    assert!(config.set_field("api-url", "ftp://example.com").is_err());
    assert!(config.set_field("currency", "euro").is_err());
    assert!(config.set_field("reference-timeout", "0").is_err());
    assert!(config.set_field("colour", "blue").is_err());
    assert_eq!(config.api_base_url, Config::default().api_base_url);
    assert_eq!(config.currency, "EUR");
}
