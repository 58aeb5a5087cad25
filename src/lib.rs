// almost everything lives in the library crate so the integration tests in
// tests/api can drive it; src/main.rs is only the entrypoint

pub mod configuration;
pub mod directory_client;
pub mod domain;
pub mod mailing_list_client;
pub mod startup;
pub mod sync;
pub mod telemetry;
