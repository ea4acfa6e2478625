//! Integration tests for debrid-search
//!
//! Tests are organized by component:
//! - cinemeta_test: Cinemeta metadata client tests
//! - real_debrid_test: Real-Debrid client tests
//! - debrid_link_test: DebridLink client tests
//! - all_debrid_test: AllDebrid client tests
//! - premiumize_test: Premiumize client tests
//! - torbox_test: TorBox client tests
//! - provider_test: Dispatcher flows (search -> filter -> normalize -> streams)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
