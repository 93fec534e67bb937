#![doc(test(attr(deny(warnings))))]

//! Donation Desk drives a donation / team-registration form and the matching
//! admin dashboard against a REST backend.
//!
//! The pure pieces (pricing, validation, the wizard state machine) live in
//! [`core`]; the REST clients live in [`api`]; [`cli`] is the terminal front
//! end built on top of both.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Donation Desk tracing initialized.");
    });
}
