//! External capability traits
//!
//! The sign-in flows talk to two collaborators they do not own: the on-device
//! native bridge and the identity backend. Both are pluggable trait objects so
//! platform glue, the REST backend and test mocks can be swapped freely.

use crate::models::{CapabilityError, NativeSignInRequest, PhoneVerificationEvent, SessionResult};
use crate::providers::AuthCredential;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// On-device sign-in capability
///
/// Implementations must not retry on their own; the flows never retry either.
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Run the native sign-in UI for `request.provider_id`
    ///
    /// # Returns
    /// The provider-specific result as JSON (camelCase fields), decoded by the
    /// calling flow into its own result shape.
    ///
    /// # Errors
    /// Returns an error if the user cancels, the provider SDK fails, or the
    /// platform rejects the call. The error reaches the caller unchanged.
    async fn sign_in(
        &self,
        request: NativeSignInRequest,
    ) -> Result<serde_json::Value, CapabilityError>;

    /// Sign out of every native provider session
    ///
    /// # Errors
    /// Returns an error if the platform sign-out fails
    async fn sign_out(&self) -> Result<(), CapabilityError>;

    /// Subscribe to phone verification notifications (code sent, code auto-retrieved)
    ///
    /// Only events emitted after subscribing are delivered.
    fn phone_events(&self) -> broadcast::Receiver<PhoneVerificationEvent>;
}

/// Identity backend credential exchange capability
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Exchange a provider credential for a web session
    ///
    /// # Errors
    /// Returns an error if the backend rejects the credential or cannot be
    /// reached. The error reaches the caller unchanged.
    async fn exchange_credential(
        &self,
        credential: AuthCredential,
    ) -> Result<SessionResult, CapabilityError>;

    /// End the current web session
    ///
    /// # Errors
    /// Returns an error if the backend sign-out fails
    async fn sign_out(&self) -> Result<(), CapabilityError>;
}
