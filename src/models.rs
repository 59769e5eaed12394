use crate::providers::{NativeData, ProviderEntry, ProviderId};
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod session;

pub use auth::{AuthError, CapabilityError};
pub use session::{CombinedResult, SessionResult, SessionUser, UserInfo};

/// Extra input for flows that need it (only the phone flow today)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignInOptions {
    pub phone: String,
    /// Present only on the second phone call, once the user typed the SMS code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

impl SignInOptions {
    #[must_use]
    pub fn phone(phone: &str, verification_code: Option<&str>) -> Self {
        Self {
            phone: phone.to_string(),
            verification_code: verification_code.map(ToString::to_string),
        }
    }
}

/// Payload handed to the native bridge's `signIn`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NativeSignInRequest {
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SignInOptions>,
}

impl NativeSignInRequest {
    #[must_use]
    pub fn new(provider: ProviderId, data: Option<SignInOptions>) -> Self {
        Self {
            provider_id: provider.as_str().to_string(),
            data,
        }
    }

    /// Build the request a registry row describes; `data` is dropped for
    /// providers that take none
    #[must_use]
    pub fn for_entry(entry: &ProviderEntry, data: Option<SignInOptions>) -> Self {
        let data = match entry.native_data {
            NativeData::None => None,
            NativeData::PhoneOptions => data,
        };
        Self::new(entry.provider, data)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInResult {
    pub provider_id: Option<String>,
    pub id_token: String,
}

/// Facebook hands back its access token in the `idToken` field
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FacebookSignInResult {
    pub provider_id: Option<String>,
    pub id_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSignInResult {
    pub provider_id: Option<String>,
    pub id_token: String,
    pub secret: String,
}

/// Sign in with Apple assertion, consumed whole by the Apple credential builder
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppleSignInResult {
    pub provider_id: Option<String>,
    pub id_token: String,
    pub raw_nonce: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignInResult {
    pub provider_id: Option<String>,
    pub verification_id: Option<String>,
    pub verification_code: Option<String>,
}

impl PhoneSignInResult {
    /// The SMS code, if verification has completed
    ///
    /// An empty code counts as absent.
    #[must_use]
    pub fn verification_code(&self) -> Option<&str> {
        self.verification_code.as_deref().filter(|code| !code.is_empty())
    }
}

/// Native result of whichever provider the dispatcher ran
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProviderResult {
    Google(GoogleSignInResult),
    Facebook(FacebookSignInResult),
    Twitter(TwitterSignInResult),
    Apple(AppleSignInResult),
    Phone(PhoneSignInResult),
}

impl ProviderResult {
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        match self {
            ProviderResult::Google(_) => ProviderId::Google,
            ProviderResult::Facebook(_) => ProviderId::Facebook,
            ProviderResult::Twitter(_) => ProviderId::Twitter,
            ProviderResult::Apple(_) => ProviderId::Apple,
            ProviderResult::Phone(_) => ProviderId::Phone,
        }
    }
}

impl From<GoogleSignInResult> for ProviderResult {
    fn from(result: GoogleSignInResult) -> Self {
        ProviderResult::Google(result)
    }
}

impl From<FacebookSignInResult> for ProviderResult {
    fn from(result: FacebookSignInResult) -> Self {
        ProviderResult::Facebook(result)
    }
}

impl From<TwitterSignInResult> for ProviderResult {
    fn from(result: TwitterSignInResult) -> Self {
        ProviderResult::Twitter(result)
    }
}

impl From<AppleSignInResult> for ProviderResult {
    fn from(result: AppleSignInResult) -> Self {
        ProviderResult::Apple(result)
    }
}

impl From<PhoneSignInResult> for ProviderResult {
    fn from(result: PhoneSignInResult) -> Self {
        ProviderResult::Phone(result)
    }
}

/// SMS code auto-retrieved by the device
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCodeReceived {
    pub verification_id: String,
    pub verification_code: String,
}

/// Phone verification lifecycle notifications emitted by the native bridge
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PhoneVerificationEvent {
    #[serde(rename_all = "camelCase")]
    CodeSent { verification_id: String },
    CodeReceived(PhoneCodeReceived),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_request_serialization() {
        let request = NativeSignInRequest::new(
            ProviderId::Phone,
            Some(SignInOptions::phone("+15555550100", None)),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "providerId": "phone", "data": { "phone": "+15555550100" } })
        );

        let request = NativeSignInRequest::new(ProviderId::Google, None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "providerId": "google.com" }));
    }

    #[test]
    fn test_request_data_follows_registry_row() {
        let options = SignInOptions::phone("+15555550100", Some("C1"));

        let request =
            NativeSignInRequest::for_entry(ProviderId::Google.entry(), Some(options.clone()));
        assert_eq!(request.provider_id, "google.com");
        assert!(request.data.is_none());

        let request =
            NativeSignInRequest::for_entry(ProviderId::Phone.entry(), Some(options.clone()));
        assert_eq!(request.data, Some(options));
    }

    #[test]
    fn test_twitter_result_requires_secret() {
        let parsed: Result<TwitterSignInResult, _> =
            serde_json::from_value(json!({ "idToken": "T1" }));
        assert!(parsed.is_err());

        let parsed: TwitterSignInResult = serde_json::from_value(json!({
            "providerId": "twitter.com",
            "idToken": "T1",
            "secret": "S1"
        }))
        .unwrap();
        assert_eq!(parsed.id_token, "T1");
        assert_eq!(parsed.secret, "S1");
    }

    #[test]
    fn test_phone_result_empty_code_is_absent() {
        let pending: PhoneSignInResult =
            serde_json::from_value(json!({ "verificationId": "V1", "verificationCode": "" }))
                .unwrap();
        assert!(pending.verification_code().is_none());

        let pending: PhoneSignInResult =
            serde_json::from_value(json!({ "verificationId": "V1" })).unwrap();
        assert!(pending.verification_code().is_none());

        let done: PhoneSignInResult =
            serde_json::from_value(json!({ "verificationId": "V1", "verificationCode": "C1" }))
                .unwrap();
        assert_eq!(done.verification_code(), Some("C1"));
    }

    #[test]
    fn test_phone_event_wire_format() {
        let event: PhoneVerificationEvent =
            serde_json::from_value(json!({ "event": "codeSent", "verificationId": "V1" })).unwrap();
        assert_eq!(
            event,
            PhoneVerificationEvent::CodeSent {
                verification_id: "V1".to_string()
            }
        );

        let event: PhoneVerificationEvent = serde_json::from_value(
            json!({ "event": "codeReceived", "verificationId": "V1", "verificationCode": "C1" }),
        )
        .unwrap();
        assert!(matches!(
            event,
            PhoneVerificationEvent::CodeReceived(ref code) if code.verification_code == "C1"
        ));
    }
}
