//! Mock capabilities for testing
//!
//! This module provides recording fakes of the native bridge and the identity
//! backend so sign-in flows can be tested without a device or network.

use crate::authentication::traits::{IdentityBackend, NativeBridge};
use crate::models::{
    CapabilityError, NativeSignInRequest, PhoneVerificationEvent, SessionResult,
};
use crate::providers::{AuthCredential, ProviderId};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tokio::sync::broadcast;

use super::fixtures::TestFixtures;

/// Error raised by the mocks; tests downcast to it to check pass-through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCapabilityError(pub String);

impl fmt::Display for MockCapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for MockCapabilityError {}

fn mock_error(message: &str) -> CapabilityError {
    Box::new(MockCapabilityError(message.to_string()))
}

/// Native bridge fake with per-provider scripted answers
///
/// # Panics
///
/// Methods panic if an internal mutex is poisoned by a panicking test.
pub struct MockNativeBridge {
    responses: HashMap<ProviderId, Result<Value, String>>,
    sign_out_failure: Option<String>,
    requests: Mutex<Vec<NativeSignInRequest>>,
    sign_out_calls: Mutex<usize>,
    events: Mutex<Option<broadcast::Sender<PhoneVerificationEvent>>>,
}

impl Default for MockNativeBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNativeBridge {
    /// Create a bridge with no scripted answers; every sign-in fails
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            responses: HashMap::new(),
            sign_out_failure: None,
            requests: Mutex::new(Vec::new()),
            sign_out_calls: Mutex::new(0),
            events: Mutex::new(Some(sender)),
        }
    }

    /// Answer sign-ins for `provider` with `payload`
    #[must_use]
    pub fn with_response(mut self, provider: ProviderId, payload: Value) -> Self {
        self.responses.insert(provider, Ok(payload));
        self
    }

    /// Fail sign-ins for `provider` with `message`
    #[must_use]
    pub fn with_failure(mut self, provider: ProviderId, message: &str) -> Self {
        self.responses.insert(provider, Err(message.to_string()));
        self
    }

    /// Fail native sign-out with `message`
    #[must_use]
    pub fn with_sign_out_failure(mut self, message: &str) -> Self {
        self.sign_out_failure = Some(message.to_string());
        self
    }

    /// Every sign-in request received, in order
    #[must_use]
    pub fn requests(&self) -> Vec<NativeSignInRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        *self.sign_out_calls.lock().unwrap()
    }

    /// Emit a phone event; returns the number of listeners that received it
    pub fn emit(&self, event: PhoneVerificationEvent) -> usize {
        self.events
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }

    /// Wait until someone listens, then emit a phone event
    pub async fn emit_when_subscribed(&self, event: PhoneVerificationEvent) {
        while self.listener_count() == 0 {
            tokio::task::yield_now().await;
        }
        self.emit(event);
    }

    /// Close the phone event stream for current and future listeners
    pub fn close_events(&self) {
        self.events.lock().unwrap().take();
    }

    fn listener_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

#[async_trait]
impl NativeBridge for MockNativeBridge {
    async fn sign_in(&self, request: NativeSignInRequest) -> Result<Value, CapabilityError> {
        let provider = ProviderId::resolve(&request.provider_id);
        self.requests.lock().unwrap().push(request.clone());

        match provider.and_then(|provider| self.responses.get(&provider)) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(message)) => Err(mock_error(message)),
            None => Err(mock_error(&format!(
                "no scripted native response for {}",
                request.provider_id
            ))),
        }
    }

    async fn sign_out(&self) -> Result<(), CapabilityError> {
        *self.sign_out_calls.lock().unwrap() += 1;
        match &self.sign_out_failure {
            Some(message) => Err(mock_error(message)),
            None => Ok(()),
        }
    }

    fn phone_events(&self) -> broadcast::Receiver<PhoneVerificationEvent> {
        match self.events.lock().unwrap().as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }
}

/// Identity backend fake that records every credential it is handed
///
/// # Panics
///
/// Methods panic if an internal mutex is poisoned by a panicking test.
pub struct MockIdentityBackend {
    response: Result<SessionResult, String>,
    sign_out_failure: Option<String>,
    credentials: Mutex<Vec<AuthCredential>>,
    sign_out_calls: Mutex<usize>,
}

impl Default for MockIdentityBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityBackend {
    /// Create a backend that answers with [`TestFixtures::session`] for `test-uid`
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(TestFixtures::session("test-uid"))
    }

    #[must_use]
    pub fn with_session(session: SessionResult) -> Self {
        Self {
            response: Ok(session),
            sign_out_failure: None,
            credentials: Mutex::new(Vec::new()),
            sign_out_calls: Mutex::new(0),
        }
    }

    /// Create a backend that rejects every credential with `message`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::new()
        }
    }

    /// Fail backend sign-out with `message`
    #[must_use]
    pub fn with_sign_out_failure(mut self, message: &str) -> Self {
        self.sign_out_failure = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    /// Take the recorded credentials, leaving the record empty
    #[must_use]
    pub fn take_credentials(&self) -> Vec<AuthCredential> {
        std::mem::take(&mut *self.credentials.lock().unwrap())
    }

    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        *self.sign_out_calls.lock().unwrap()
    }
}

#[async_trait]
impl IdentityBackend for MockIdentityBackend {
    async fn exchange_credential(
        &self,
        credential: AuthCredential,
    ) -> Result<SessionResult, CapabilityError> {
        self.credentials.lock().unwrap().push(credential);
        self.response.clone().map_err(|message| mock_error(&message))
    }

    async fn sign_out(&self) -> Result<(), CapabilityError> {
        *self.sign_out_calls.lock().unwrap() += 1;
        match &self.sign_out_failure {
            Some(message) => Err(mock_error(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_provider_fails() {
        let bridge = MockNativeBridge::new();
        let err = bridge
            .sign_in(NativeSignInRequest::new(ProviderId::Google, None))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "no scripted native response for google.com");
        assert_eq!(bridge.call_count(), 1);
    }

    #[test]
    fn test_emit_without_listeners() {
        let bridge = MockNativeBridge::new();
        let delivered = bridge.emit(PhoneVerificationEvent::CodeSent {
            verification_id: "V1".to_string(),
        });
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_backend_records_credentials() {
        let backend = MockIdentityBackend::new();
        backend
            .exchange_credential(AuthCredential::Google {
                id_token: "T1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 1);
        assert_eq!(
            backend.take_credentials(),
            vec![AuthCredential::Google {
                id_token: "T1".to_string()
            }]
        );
        assert_eq!(backend.call_count(), 0);
    }
}
