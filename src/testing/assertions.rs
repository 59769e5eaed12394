//! Assertion helpers for sign-in outcomes
//!
//! Capability errors must reach the caller untouched, so most helpers downcast
//! the wrapped error back to the [`MockCapabilityError`] the fake raised.

use crate::models::AuthError;

use super::mock::MockCapabilityError;

/// Assert that `err` is a native sign-in failure carrying `message`
///
/// # Panics
///
/// Panics if the error is another variant or wraps a different error.
pub fn assert_native_failure(err: &AuthError, message: &str) {
    assert!(
        matches!(err, AuthError::NativeSignIn(_)),
        "Expected NativeSignIn, got {err:?}"
    );
    assert_mock_error(err, message);
}

/// Assert that `err` is a credential exchange failure carrying `message`
///
/// # Panics
///
/// Panics if the error is another variant or wraps a different error.
pub fn assert_exchange_failure(err: &AuthError, message: &str) {
    assert!(
        matches!(err, AuthError::CredentialExchange(_)),
        "Expected CredentialExchange, got {err:?}"
    );
    assert_mock_error(err, message);
}

/// Assert that `err` rejected exactly `provider_id`
///
/// # Panics
///
/// Panics if the error is another variant or names another provider.
pub fn assert_unsupported_provider(err: &AuthError, provider_id: &str) {
    match err {
        AuthError::UnsupportedProvider(id) => assert_eq!(id, provider_id),
        other => panic!("Expected UnsupportedProvider, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        format!("The '{provider_id}' provider was not supported")
    );
}

/// Assert that the capability error wrapped by `err` is the mock's `message`
///
/// # Panics
///
/// Panics if `err` wraps no capability error or one not raised by a mock.
pub fn assert_mock_error(err: &AuthError, message: &str) {
    let inner = err
        .capability_error()
        .unwrap_or_else(|| panic!("Expected a capability error, got {err:?}"));
    let mock = inner
        .downcast_ref::<MockCapabilityError>()
        .unwrap_or_else(|| panic!("Expected a mock error, got {inner}"));
    assert_eq!(mock.0, message);
}
