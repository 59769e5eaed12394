//! Unified testing utilities for authbridge
//!
//! This module gathers the fakes, fixtures and assertion helpers used by the
//! unit tests and by the integration tests under `tests/` (which build with
//! the `testing` feature).
//!
//! ## Organization
//!
//! - [`fixtures`] - Native bridge payloads and web sessions
//! - [`mock`] - Recording fakes of the native bridge and identity backend
//! - [`assertions`] - Assertion helpers for sign-in outcomes
//!
//! ## Usage
//!
//! ```rust
//! use authbridge::providers::ProviderId;
//! use authbridge::testing::{fixtures::TestFixtures, mock::MockNativeBridge};
//!
//! let bridge = MockNativeBridge::new()
//!     .with_response(ProviderId::Google, TestFixtures::google_payload("T1"));
//! assert_eq!(bridge.call_count(), 0);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use assertions::*;
pub use fixtures::TestFixtures;
pub use mock::{MockCapabilityError, MockIdentityBackend, MockNativeBridge};

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test user name
    pub const TEST_USER_NAME: &str = "Test User";

    /// Default test phone number
    pub const TEST_PHONE: &str = "+15555550100";

    /// Identifiers the dispatcher must reject
    pub const UNSUPPORTED_PROVIDERS: &[&str] = &["github.com", "Google.com", "", "password"];
}
