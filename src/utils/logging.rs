// Centralized logging for sign-in flows. Tokens, secrets and codes are never logged.
use crate::models::AuthError;
use crate::providers::ProviderId;
use log::{debug, info, warn};
use std::fmt;

/// Position of a sign-in flow in its two-stage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    NativePending,
    NativeFailed,
    CredentialBuilt,
    ExchangePending,
    ExchangeFailed,
    Succeeded,
    /// Phone only: the native call returned without an SMS code
    CompletedEmpty,
}

impl FlowState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            FlowState::NativeFailed
                | FlowState::ExchangeFailed
                | FlowState::Succeeded
                | FlowState::CompletedEmpty
        )
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Idle => "idle",
            FlowState::NativePending => "native-pending",
            FlowState::NativeFailed => "native-failed",
            FlowState::CredentialBuilt => "credential-built",
            FlowState::ExchangePending => "exchange-pending",
            FlowState::ExchangeFailed => "exchange-failed",
            FlowState::Succeeded => "succeeded",
            FlowState::CompletedEmpty => "completed-empty",
        };
        f.write_str(name)
    }
}

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log a flow state transition
    pub fn log_flow_state(provider: ProviderId, state: FlowState) {
        if state.is_terminal() {
            debug!("🏁 {} sign-in flow finished: {}", provider.display_name(), state);
        } else {
            debug!("🔄 {} sign-in flow -> {}", provider.display_name(), state);
        }
    }

    /// Log the start of a native sign-in
    pub fn log_native_sign_in_start(provider: ProviderId, with_data: bool) {
        info!(
            "📱 Starting native {} sign-in ({}, data: {})",
            provider.display_name(),
            provider,
            if with_data { "present" } else { "none" }
        );
    }

    /// Log a failed flow stage without altering the error
    pub fn log_flow_failure(provider: ProviderId, err: &AuthError) {
        warn!("❌ {} sign-in failed: {err}", provider.display_name());
    }

    /// Log credential exchange start
    pub fn log_exchange_start(provider: ProviderId) {
        debug!(
            "🔑 Exchanging {} credential with identity backend",
            provider.display_name()
        );
    }

    /// Log a successful exchange
    pub fn log_session_created(provider: ProviderId, uid: Option<&str>) {
        info!(
            "✅ {} sign-in completed (uid: {})",
            provider.display_name(),
            uid.unwrap_or("none")
        );
    }

    /// Log that a phone verification is still waiting for its SMS code
    pub fn log_phone_verification_pending(verification_id_present: bool) {
        info!(
            "⏳ Phone verification pending, no code yet (verification id: {})",
            if verification_id_present { "present" } else { "missing" }
        );
    }

    /// Log a dispatcher rejection
    pub fn log_unsupported_provider(provider_id: &str) {
        warn!("⚠️  Unsupported provider requested: {provider_id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let terminal = [
            FlowState::NativeFailed,
            FlowState::ExchangeFailed,
            FlowState::Succeeded,
            FlowState::CompletedEmpty,
        ];
        for state in terminal {
            assert!(state.is_terminal(), "{state}");
        }
        for state in [
            FlowState::Idle,
            FlowState::NativePending,
            FlowState::CredentialBuilt,
            FlowState::ExchangePending,
        ] {
            assert!(!state.is_terminal(), "{state}");
        }
    }
}
