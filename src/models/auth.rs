//! Common authentication error types
//!
//! This module provides the error type returned by every sign-in flow and by
//! the facade operations. Failures raised by the native bridge or the identity
//! backend are carried through untouched as [`CapabilityError`].

use crate::providers::ProviderId;
use std::fmt;

/// Error raised by an external capability (native bridge or identity backend)
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for sign-in flows and facade operations
#[derive(Debug)]
pub enum AuthError {
    /// The dispatcher received an identifier outside the known providers
    UnsupportedProvider(String),
    /// The native bridge call failed or was rejected
    NativeSignIn(CapabilityError),
    /// The native bridge answered with a payload that does not match the provider's result shape
    InvalidNativeResult {
        provider: ProviderId,
        message: String,
    },
    /// The identity backend rejected or failed the credential exchange
    CredentialExchange(CapabilityError),
    /// Native or backend sign-out failed
    SignOut(CapabilityError),
    /// The native bridge closed its phone verification event stream
    EventStreamClosed,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UnsupportedProvider(provider_id) => {
                write!(f, "The '{provider_id}' provider was not supported")
            }
            AuthError::NativeSignIn(err) => write!(f, "Native sign-in failed: {err}"),
            AuthError::InvalidNativeResult { provider, message } => {
                write!(f, "Invalid native sign-in result for {provider}: {message}")
            }
            AuthError::CredentialExchange(err) => write!(f, "Credential exchange failed: {err}"),
            AuthError::SignOut(err) => write!(f, "Sign-out failed: {err}"),
            AuthError::EventStreamClosed => {
                write!(f, "Phone verification event stream closed")
            }
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::NativeSignIn(err)
            | AuthError::CredentialExchange(err)
            | AuthError::SignOut(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl AuthError {
    /// Get the underlying capability failure, if this error wraps one
    #[must_use]
    pub fn capability_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            AuthError::NativeSignIn(err)
            | AuthError::CredentialExchange(err)
            | AuthError::SignOut(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug)]
    struct BridgeFailure;

    impl fmt::Display for BridgeFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "user cancelled")
        }
    }

    impl std::error::Error for BridgeFailure {}

    #[test]
    fn test_unsupported_provider_message() {
        let err = AuthError::UnsupportedProvider("github.com".to_string());
        assert_eq!(err.to_string(), "The 'github.com' provider was not supported");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_capability_error_is_passed_through() {
        let err = AuthError::NativeSignIn(Box::new(BridgeFailure));
        assert_eq!(err.to_string(), "Native sign-in failed: user cancelled");

        let inner = err.capability_error().unwrap();
        assert!(inner.downcast_ref::<BridgeFailure>().is_some());
        assert_eq!(err.source().unwrap().to_string(), "user cancelled");
    }

    #[test]
    fn test_invalid_native_result_names_provider() {
        let err = AuthError::InvalidNativeResult {
            provider: ProviderId::Twitter,
            message: "missing field `secret`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid native sign-in result for twitter.com: missing field `secret`"
        );
    }
}
