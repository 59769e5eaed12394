//! Phone verification hooks and sign-out
//!
//! These pass straight through to the native bridge and identity backend and
//! sit beside the sign-in flows so callers only need one service handle.

use crate::authentication::service::NativeAuthService;
use crate::models::{AuthError, PhoneCodeReceived, PhoneVerificationEvent};
use tokio::sync::broadcast::error::RecvError;

impl NativeAuthService {
    /// Wait for the native bridge to report that an SMS code was sent
    ///
    /// # Returns
    /// The verification id of the pending phone sign-in
    ///
    /// # Errors
    /// Returns `EventStreamClosed` if the bridge stops emitting events
    pub async fn on_phone_code_sent(&self) -> Result<String, AuthError> {
        self.next_phone_event(|event| match event {
            PhoneVerificationEvent::CodeSent { verification_id } => Some(verification_id),
            PhoneVerificationEvent::CodeReceived(_) => None,
        })
        .await
    }

    /// Wait for the device to auto-retrieve an SMS code
    ///
    /// # Errors
    /// Returns `EventStreamClosed` if the bridge stops emitting events
    pub async fn on_phone_code_received(&self) -> Result<PhoneCodeReceived, AuthError> {
        self.next_phone_event(|event| match event {
            PhoneVerificationEvent::CodeReceived(code) => Some(code),
            PhoneVerificationEvent::CodeSent { .. } => None,
        })
        .await
    }

    /// Sign out natively, then end the web session
    ///
    /// # Errors
    ///
    /// Returns `SignOut` if either step fails; the backend is not contacted
    /// when the native sign-out fails
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.bridge.sign_out().await.map_err(|err| {
            log::warn!("❌ Native sign-out failed: {err}");
            AuthError::SignOut(err)
        })?;
        self.backend.sign_out().await.map_err(|err| {
            log::warn!("❌ Identity backend sign-out failed: {err}");
            AuthError::SignOut(err)
        })?;
        log::info!("👋 Signed out of native and web sessions");
        Ok(())
    }

    async fn next_phone_event<T>(
        &self,
        mut select: impl FnMut(PhoneVerificationEvent) -> Option<T> + Send,
    ) -> Result<T, AuthError> {
        let mut events = self.bridge.phone_events();
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(value) = select(event) {
                        return Ok(value);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("Phone verification listener lagged, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return Err(AuthError::EventStreamClosed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::authentication::service::NativeAuthService;
    use crate::models::{AuthError, PhoneCodeReceived, PhoneVerificationEvent};
    use crate::testing::mock::{MockIdentityBackend, MockNativeBridge};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_code_received_skips_code_sent() {
        let bridge = Arc::new(MockNativeBridge::new());
        let service = NativeAuthService::new(bridge.clone(), Arc::new(MockIdentityBackend::new()));

        let emitter = {
            let bridge = bridge.clone();
            tokio::spawn(async move {
                bridge
                    .emit_when_subscribed(PhoneVerificationEvent::CodeSent {
                        verification_id: "V1".to_string(),
                    })
                    .await;
                bridge.emit(PhoneVerificationEvent::CodeReceived(PhoneCodeReceived {
                    verification_id: "V1".to_string(),
                    verification_code: "C1".to_string(),
                }));
            })
        };

        let received = service.on_phone_code_received().await.unwrap();
        emitter.await.unwrap();

        assert_eq!(received.verification_id, "V1");
        assert_eq!(received.verification_code, "C1");
    }

    #[tokio::test]
    async fn test_closed_event_stream() {
        let bridge = Arc::new(MockNativeBridge::new());
        bridge.close_events();
        let service = NativeAuthService::new(bridge, Arc::new(MockIdentityBackend::new()));

        let err = service.on_phone_code_sent().await.unwrap_err();
        assert!(matches!(err, AuthError::EventStreamClosed));
    }

    #[tokio::test]
    async fn test_native_sign_out_failure_skips_backend() {
        let bridge = Arc::new(MockNativeBridge::new().with_sign_out_failure("native down"));
        let backend = Arc::new(MockIdentityBackend::new());
        let service = NativeAuthService::new(bridge.clone(), backend.clone());

        let err = service.sign_out().await.unwrap_err();

        assert!(matches!(err, AuthError::SignOut(_)));
        assert_eq!(err.to_string(), "Sign-out failed: native down");
        assert_eq!(bridge.sign_out_calls(), 1);
        assert_eq!(backend.sign_out_calls(), 0);
    }
}
