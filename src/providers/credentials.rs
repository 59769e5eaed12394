//! Credential construction
//!
//! Each provider turns its native sign-in result into an [`AuthCredential`]
//! through a [`CredentialBuilder`]. Builders are pure: they only read the
//! native result and never touch the network.

use crate::models::{
    AppleSignInResult, FacebookSignInResult, GoogleSignInResult, PhoneSignInResult,
    ProviderResult, TwitterSignInResult,
};
use crate::providers::registry::{ProviderId, APPLE_PROVIDER_ID};
use serde::de::DeserializeOwned;

/// Scopes every Sign in with Apple credential requests, in this order
pub const REQUIRED_APPLE_SCOPES: [&str; 2] = ["email", "name"];

/// Provider proof handed to the identity backend
///
/// Not `Clone`: a credential is moved into exactly one exchange call.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthCredential {
    Google {
        id_token: String,
    },
    Facebook {
        access_token: String,
    },
    Twitter {
        token: String,
        secret: String,
    },
    OAuth(OAuthCredential),
    Phone {
        verification_id: String,
        verification_code: String,
    },
}

impl AuthCredential {
    /// Wire identifier of the provider this credential was built for
    #[must_use]
    pub fn provider_id(&self) -> &str {
        match self {
            AuthCredential::Google { .. } => ProviderId::Google.as_str(),
            AuthCredential::Facebook { .. } => ProviderId::Facebook.as_str(),
            AuthCredential::Twitter { .. } => ProviderId::Twitter.as_str(),
            AuthCredential::OAuth(credential) => &credential.provider_id,
            AuthCredential::Phone { .. } => ProviderId::Phone.as_str(),
        }
    }
}

/// Credential for a generic OAuth issuer (Apple)
#[derive(Debug, PartialEq, Eq)]
pub struct OAuthCredential {
    pub provider_id: String,
    pub scopes: Vec<String>,
    pub id_token: String,
    pub access_token: Option<String>,
    pub raw_nonce: Option<String>,
}

/// OAuth issuer description with its requested claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProvider {
    provider_id: String,
    scopes: Vec<String>,
}

impl OAuthProvider {
    #[must_use]
    pub fn new(provider_id: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            scopes: Vec::new(),
        }
    }

    /// Request an additional scope; duplicates are ignored, order is kept
    pub fn add_scope(&mut self, scope: &str) -> &mut Self {
        if !self.scopes.iter().any(|existing| existing == scope) {
            self.scopes.push(scope.to_string());
        }
        self
    }

    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Derive a credential from a native Apple assertion
    #[must_use]
    pub fn credential(&self, assertion: &AppleSignInResult) -> OAuthCredential {
        OAuthCredential {
            provider_id: self.provider_id.clone(),
            scopes: self.scopes.clone(),
            id_token: assertion.id_token.clone(),
            access_token: assertion.access_token.clone(),
            raw_nonce: assertion.raw_nonce.clone(),
        }
    }
}

/// Builds a provider's credential from its native sign-in result
pub trait CredentialBuilder: Send + Sync {
    /// Provider this builder belongs to
    const PROVIDER: ProviderId;

    /// Native result shape returned by the bridge for this provider
    type Result: DeserializeOwned + Into<ProviderResult> + Send + Sync;

    fn build_credential(&self, result: &Self::Result) -> AuthCredential;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleCredentials;

impl CredentialBuilder for GoogleCredentials {
    const PROVIDER: ProviderId = ProviderId::Google;
    type Result = GoogleSignInResult;

    fn build_credential(&self, result: &GoogleSignInResult) -> AuthCredential {
        AuthCredential::Google {
            id_token: result.id_token.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FacebookCredentials;

impl CredentialBuilder for FacebookCredentials {
    const PROVIDER: ProviderId = ProviderId::Facebook;
    type Result = FacebookSignInResult;

    fn build_credential(&self, result: &FacebookSignInResult) -> AuthCredential {
        AuthCredential::Facebook {
            access_token: result.id_token.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterCredentials;

impl CredentialBuilder for TwitterCredentials {
    const PROVIDER: ProviderId = ProviderId::Twitter;
    type Result = TwitterSignInResult;

    fn build_credential(&self, result: &TwitterSignInResult) -> AuthCredential {
        AuthCredential::Twitter {
            token: result.id_token.clone(),
            secret: result.secret.clone(),
        }
    }
}

/// Apple credentials go through an [`OAuthProvider`] for `apple.com`
///
/// `email` and `name` are always requested first; configured scopes are
/// appended after them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppleCredentials {
    extra_scopes: Vec<String>,
}

impl AppleCredentials {
    #[must_use]
    pub fn new<S: AsRef<str>>(extra_scopes: &[S]) -> Self {
        Self {
            extra_scopes: extra_scopes
                .iter()
                .map(|scope| scope.as_ref().to_string())
                .collect(),
        }
    }

    /// OAuth provider with the required scopes, then the extra ones, in order
    #[must_use]
    pub fn oauth_provider(&self) -> OAuthProvider {
        let mut provider = OAuthProvider::new(APPLE_PROVIDER_ID);
        for scope in REQUIRED_APPLE_SCOPES {
            provider.add_scope(scope);
        }
        for scope in &self.extra_scopes {
            provider.add_scope(scope);
        }
        provider
    }
}

impl CredentialBuilder for AppleCredentials {
    const PROVIDER: ProviderId = ProviderId::Apple;
    type Result = AppleSignInResult;

    fn build_credential(&self, result: &AppleSignInResult) -> AuthCredential {
        AuthCredential::OAuth(self.oauth_provider().credential(result))
    }
}

/// Phone credentials pair the verification id with the SMS code
///
/// Callers check [`PhoneSignInResult::verification_code`] first; a result
/// without a code has nothing to exchange.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneCredentials;

impl CredentialBuilder for PhoneCredentials {
    const PROVIDER: ProviderId = ProviderId::Phone;
    type Result = PhoneSignInResult;

    fn build_credential(&self, result: &PhoneSignInResult) -> AuthCredential {
        AuthCredential::Phone {
            verification_id: result.verification_id.clone().unwrap_or_default(),
            verification_code: result.verification_code().unwrap_or_default().to_string(),
        }
    }
}
