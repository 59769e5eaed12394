//! Native sign-in service
//!
//! [`NativeAuthService`] owns the dispatcher and the five per-provider flows.
//! Every flow runs the same two stages: a native sign-in through the
//! [`NativeBridge`], then a credential exchange with the [`IdentityBackend`].
//! Stage 2 starts only once stage 1 has resolved, each capability is called at
//! most once, and errors are handed back exactly as the capability raised them.

use crate::authentication::traits::{IdentityBackend, NativeBridge};
use crate::models::{
    AppleSignInResult, AuthError, CombinedResult, FacebookSignInResult, GoogleSignInResult,
    NativeSignInRequest, PhoneSignInResult, ProviderResult, SignInOptions, TwitterSignInResult,
};
use crate::providers::{
    AppleCredentials, CredentialBuilder, FacebookCredentials, GoogleCredentials,
    PhoneCredentials, ProviderId, TwitterCredentials,
};
use crate::utils::logging::{FlowState, LoggingHelper};
use std::sync::Arc;

/// Result of [`NativeAuthService::sign_in`]: `None` only for a phone
/// verification still waiting for its code
pub type DispatchResult = Result<Option<CombinedResult<ProviderResult>>, AuthError>;

/// Dispatcher and per-provider sign-in flows
///
/// Cheap to clone; holds no mutable state, so concurrent sign-ins are independent.
#[derive(Clone)]
pub struct NativeAuthService {
    pub(crate) bridge: Arc<dyn NativeBridge>,
    pub(crate) backend: Arc<dyn IdentityBackend>,
    apple: AppleCredentials,
}

impl NativeAuthService {
    /// Create a service requesting only the required Apple scopes (`email`, `name`)
    #[must_use]
    pub fn new(bridge: Arc<dyn NativeBridge>, backend: Arc<dyn IdentityBackend>) -> Self {
        Self {
            bridge,
            backend,
            apple: AppleCredentials::default(),
        }
    }

    /// Replace the Apple credential builder (for extra scopes)
    #[must_use]
    pub fn with_apple_credentials(mut self, apple: AppleCredentials) -> Self {
        self.apple = apple;
        self
    }

    #[must_use]
    pub const fn apple_credentials(&self) -> &AppleCredentials {
        &self.apple
    }

    /// Sign in with the provider named by `provider_id`
    ///
    /// `data` is forwarded to the phone flow only; every other provider ignores it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `provider_id` is not one of the five known identifiers (no native call is made)
    /// - the selected flow fails (see the per-provider methods)
    pub async fn sign_in(&self, provider_id: &str, data: Option<SignInOptions>) -> DispatchResult {
        let Some(provider) = ProviderId::resolve(provider_id) else {
            LoggingHelper::log_unsupported_provider(provider_id);
            return Err(AuthError::UnsupportedProvider(provider_id.to_string()));
        };

        match provider {
            ProviderId::Google => Ok(Some(self.sign_in_google().await?.map_result(Into::into))),
            ProviderId::Facebook => {
                Ok(Some(self.sign_in_facebook().await?.map_result(Into::into)))
            }
            ProviderId::Twitter => Ok(Some(self.sign_in_twitter().await?.map_result(Into::into))),
            ProviderId::Apple => Ok(Some(self.sign_in_apple().await?.map_result(Into::into))),
            ProviderId::Phone => {
                let SignInOptions {
                    phone,
                    verification_code,
                } = data.unwrap_or_default();
                let combined = self
                    .sign_in_phone(&phone, verification_code.as_deref())
                    .await?;
                Ok(combined.map(|combined| combined.map_result(Into::into)))
            }
        }
    }

    /// Native Google sign-in, then exchange of its ID token
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the native sign-in fails (`NativeSignIn`) or returns an unexpected payload
    /// - the identity backend rejects the credential (`CredentialExchange`)
    pub async fn sign_in_google(&self) -> Result<CombinedResult<GoogleSignInResult>, AuthError> {
        self.run_flow(&GoogleCredentials).await
    }

    /// Native Facebook sign-in, then exchange of its access token
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sign_in_google`]
    pub async fn sign_in_facebook(
        &self,
    ) -> Result<CombinedResult<FacebookSignInResult>, AuthError> {
        self.run_flow(&FacebookCredentials).await
    }

    /// Native Twitter sign-in, then exchange of its token and secret
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sign_in_google`]
    pub async fn sign_in_twitter(&self) -> Result<CombinedResult<TwitterSignInResult>, AuthError> {
        self.run_flow(&TwitterCredentials).await
    }

    /// Sign in with Apple, then exchange of an OAuth credential for `apple.com`
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sign_in_google`]
    pub async fn sign_in_apple(&self) -> Result<CombinedResult<AppleSignInResult>, AuthError> {
        self.run_flow(&self.apple).await
    }

    /// Phone number sign-in
    ///
    /// The first call (no `verification_code`) usually just triggers SMS
    /// delivery: the native result carries no code and the flow resolves to
    /// `Ok(None)` without contacting the backend. Call again with the code to
    /// finish.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sign_in_google`]
    pub async fn sign_in_phone(
        &self,
        phone: &str,
        verification_code: Option<&str>,
    ) -> Result<Option<CombinedResult<PhoneSignInResult>>, AuthError> {
        let options = SignInOptions::phone(phone, verification_code);
        let result = self.native_sign_in::<PhoneCredentials>(Some(options)).await?;

        if result.verification_code().is_none() {
            LoggingHelper::log_phone_verification_pending(result.verification_id.is_some());
            LoggingHelper::log_flow_state(ProviderId::Phone, FlowState::CompletedEmpty);
            return Ok(None);
        }

        self.exchange(&PhoneCredentials, result).await.map(Some)
    }

    async fn run_flow<B: CredentialBuilder>(
        &self,
        builder: &B,
    ) -> Result<CombinedResult<B::Result>, AuthError> {
        let result = self.native_sign_in::<B>(None).await?;
        self.exchange(builder, result).await
    }

    /// Stage 1: native sign-in, decoded into the provider's result shape
    ///
    /// `data` reaches the bridge only if the provider's registry row takes it.
    async fn native_sign_in<B: CredentialBuilder>(
        &self,
        data: Option<SignInOptions>,
    ) -> Result<B::Result, AuthError> {
        let provider = B::PROVIDER;
        LoggingHelper::log_flow_state(provider, FlowState::Idle);

        let request = NativeSignInRequest::for_entry(provider.entry(), data);
        LoggingHelper::log_native_sign_in_start(provider, request.data.is_some());
        LoggingHelper::log_flow_state(provider, FlowState::NativePending);

        let payload = self.bridge.sign_in(request).await.map_err(|err| {
            Self::fail(provider, FlowState::NativeFailed, AuthError::NativeSignIn(err))
        })?;

        serde_json::from_value(payload).map_err(|err| {
            Self::fail(
                provider,
                FlowState::NativeFailed,
                AuthError::InvalidNativeResult {
                    provider,
                    message: err.to_string(),
                },
            )
        })
    }

    /// Stage 2: build the credential and exchange it for a web session
    async fn exchange<B: CredentialBuilder>(
        &self,
        builder: &B,
        result: B::Result,
    ) -> Result<CombinedResult<B::Result>, AuthError> {
        let provider = B::PROVIDER;
        let credential = builder.build_credential(&result);
        LoggingHelper::log_flow_state(provider, FlowState::CredentialBuilt);

        LoggingHelper::log_exchange_start(provider);
        LoggingHelper::log_flow_state(provider, FlowState::ExchangePending);
        let session = self
            .backend
            .exchange_credential(credential)
            .await
            .map_err(|err| {
                Self::fail(
                    provider,
                    FlowState::ExchangeFailed,
                    AuthError::CredentialExchange(err),
                )
            })?;

        LoggingHelper::log_session_created(
            provider,
            session.user.as_ref().map(|user| user.uid.as_str()),
        );
        LoggingHelper::log_flow_state(provider, FlowState::Succeeded);
        Ok(CombinedResult { session, result })
    }

    fn fail(provider: ProviderId, state: FlowState, err: AuthError) -> AuthError {
        LoggingHelper::log_flow_failure(provider, &err);
        LoggingHelper::log_flow_state(provider, state);
        err
    }
}
