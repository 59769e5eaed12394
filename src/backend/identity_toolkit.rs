//! Identity Toolkit REST backend
//!
//! Exchanges provider credentials through `accounts:signInWithIdp` (OAuth
//! providers) and `accounts:signInWithPhoneNumber` (phone). Tokens are
//! returned to the caller as-is; nothing is cached or refreshed here.

use crate::authentication::traits::IdentityBackend;
use crate::models::{CapabilityError, SessionResult, SessionUser};
use crate::providers::{AuthCredential, OAuthCredential, ProviderId};
use crate::settings::IdentityToolkitSettings;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Provider id reported for users signed in through the identity backend
pub const FIREBASE_USER_PROVIDER_ID: &str = "firebase";

#[derive(Debug, thiserror::Error)]
pub enum IdentityToolkitError {
    #[error("Identity Toolkit API key not configured")]
    MissingApiKey,
    #[error("Invalid Identity Toolkit URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Identity Toolkit request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Identity Toolkit returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest {
    post_body: String,
    request_uri: String,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct SignInWithPhoneNumberRequest {
    session_info: String,
    code: String,
}

/// Request body for the endpoint that accepts a given credential
#[derive(Debug, PartialEq, Eq)]
enum ExchangeRequest {
    Idp(SignInWithIdpRequest),
    Phone(SignInWithPhoneNumberRequest),
}

impl ExchangeRequest {
    fn from_credential(credential: AuthCredential, request_uri: &str) -> Self {
        match credential {
            AuthCredential::Google { id_token } => Self::idp(
                &[("id_token", id_token.as_str())],
                ProviderId::Google.as_str(),
                request_uri,
            ),
            AuthCredential::Facebook { access_token } => Self::idp(
                &[("access_token", access_token.as_str())],
                ProviderId::Facebook.as_str(),
                request_uri,
            ),
            AuthCredential::Twitter { token, secret } => Self::idp(
                &[
                    ("access_token", token.as_str()),
                    ("oauth_token_secret", secret.as_str()),
                ],
                ProviderId::Twitter.as_str(),
                request_uri,
            ),
            AuthCredential::OAuth(OAuthCredential {
                provider_id,
                id_token,
                access_token,
                raw_nonce,
                ..
            }) => {
                let mut pairs = vec![("id_token", id_token.as_str())];
                if let Some(access_token) = &access_token {
                    pairs.push(("access_token", access_token.as_str()));
                }
                if let Some(nonce) = &raw_nonce {
                    pairs.push(("nonce", nonce.as_str()));
                }
                Self::idp(&pairs, &provider_id, request_uri)
            }
            AuthCredential::Phone {
                verification_id,
                verification_code,
            } => Self::Phone(SignInWithPhoneNumberRequest {
                session_info: verification_id,
                code: verification_code,
            }),
        }
    }

    /// `signInWithIdp` body; `postBody` is form-encoded with `providerId` last
    fn idp(pairs: &[(&str, &str)], provider_id: &str, request_uri: &str) -> Self {
        let mut post_body = url::form_urlencoded::Serializer::new(String::new());
        post_body
            .extend_pairs(pairs)
            .append_pair("providerId", provider_id);
        Self::Idp(SignInWithIdpRequest {
            post_body: post_body.finish(),
            request_uri: request_uri.to_string(),
            return_secure_token: true,
            return_idp_credential: true,
        })
    }
}

/// Response body shared by both sign-in endpoints
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct SignInResponse {
    local_id: String,
    provider_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    phone_number: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    is_new_user: bool,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

impl SignInResponse {
    fn into_session(self, credential_provider: &str, now: DateTime<Utc>) -> SessionResult {
        // Out-of-range lifetimes leave the expiry unknown
        let expires_at = self
            .expires_in
            .as_deref()
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        let user = (!self.local_id.is_empty()).then(|| SessionUser {
            uid: self.local_id,
            provider_id: FIREBASE_USER_PROVIDER_ID.to_string(),
            display_name: self.display_name,
            photo_url: self.photo_url,
            phone_number: self.phone_number,
            email: self.email,
        });

        SessionResult {
            user,
            provider_id: Some(
                self.provider_id
                    .unwrap_or_else(|| credential_provider.to_string()),
            ),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at,
            is_new_user: self.is_new_user,
        }
    }
}

/// Identity backend over the Identity Toolkit v1 REST API
pub struct IdentityToolkitBackend {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_uri: String,
}

impl IdentityToolkitBackend {
    /// Create a backend from settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured (directly or through the environment)
    /// - The base URL is not a valid URL
    pub fn from_settings(settings: &IdentityToolkitSettings) -> Result<Self, IdentityToolkitError> {
        let api_key = settings
            .get_api_key()
            .filter(|key| !key.is_empty())
            .ok_or(IdentityToolkitError::MissingApiKey)?;
        Url::parse(&settings.base_url)?;

        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            request_uri: settings.request_uri.clone(),
        })
    }

    /// Exchange a credential for a session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP request fails
    /// - The API answers with a non-success status
    /// - The response body is not valid JSON
    pub async fn sign_in_with_credential(
        &self,
        credential: AuthCredential,
    ) -> Result<SessionResult, IdentityToolkitError> {
        let provider_id = credential.provider_id().to_string();
        log::debug!("🔄 Identity Toolkit sign-in for {provider_id}");

        let response = match ExchangeRequest::from_credential(credential, &self.request_uri) {
            ExchangeRequest::Idp(body) => self.post("signInWithIdp", &body).await?,
            ExchangeRequest::Phone(body) => self.post("signInWithPhoneNumber", &body).await?,
        };

        Ok(response.into_session(&provider_id, Utc::now()))
    }

    fn endpoint(&self, method: &str) -> Result<Url, IdentityToolkitError> {
        let mut url = Url::parse(&format!("{}/v1/accounts:{method}", self.base_url))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<SignInResponse, IdentityToolkitError> {
        let url = self.endpoint(method)?;
        let response = self.http_client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IdentityToolkitError::Api {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentityBackend for IdentityToolkitBackend {
    async fn exchange_credential(
        &self,
        credential: AuthCredential,
    ) -> Result<SessionResult, CapabilityError> {
        Ok(self.sign_in_with_credential(credential).await?)
    }

    async fn sign_out(&self) -> Result<(), CapabilityError> {
        // Sessions are never stored here, so there is nothing to revoke locally
        log::debug!("Identity Toolkit sign-out: no local session state");
        Ok(())
    }
}

/// Pull `error.message` out of an API error body, falling back to the raw text
fn api_error_message(error_text: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(error_text)
        .map_or_else(|_| error_text.to_string(), |body| body.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings_with_key() -> IdentityToolkitSettings {
        IdentityToolkitSettings {
            api_key: Some("test-key".to_string()),
            api_key_env: None,
            ..Default::default()
        }
    }

    fn idp_post_body(credential: AuthCredential) -> String {
        match ExchangeRequest::from_credential(credential, "http://localhost") {
            ExchangeRequest::Idp(body) => {
                assert_eq!(body.request_uri, "http://localhost");
                assert!(body.return_secure_token);
                body.post_body
            }
            ExchangeRequest::Phone(body) => panic!("expected an IdP request, got {body:?}"),
        }
    }

    #[test]
    fn test_post_body_google() {
        let credential = AuthCredential::Google {
            id_token: "T1".to_string(),
        };
        assert_eq!(idp_post_body(credential), "id_token=T1&providerId=google.com");
    }

    #[test]
    fn test_post_body_twitter_token_then_secret() {
        let credential = AuthCredential::Twitter {
            token: "T1".to_string(),
            secret: "S/1".to_string(),
        };
        assert_eq!(
            idp_post_body(credential),
            "access_token=T1&oauth_token_secret=S%2F1&providerId=twitter.com"
        );
    }

    #[test]
    fn test_post_body_apple_with_nonce() {
        let credential = AuthCredential::OAuth(OAuthCredential {
            provider_id: "apple.com".to_string(),
            scopes: vec!["email".to_string(), "name".to_string()],
            id_token: "apple-jwt".to_string(),
            access_token: None,
            raw_nonce: Some("n1".to_string()),
        });
        assert_eq!(
            idp_post_body(credential),
            "id_token=apple-jwt&nonce=n1&providerId=apple.com"
        );
    }

    #[test]
    fn test_phone_credential_uses_phone_endpoint_body() {
        let credential = AuthCredential::Phone {
            verification_id: "V1".to_string(),
            verification_code: "C1".to_string(),
        };
        assert_eq!(
            ExchangeRequest::from_credential(credential, "http://localhost"),
            ExchangeRequest::Phone(SignInWithPhoneNumberRequest {
                session_info: "V1".to_string(),
                code: "C1".to_string(),
            })
        );
    }

    #[test]
    fn test_endpoint_carries_api_key() {
        let backend = IdentityToolkitBackend::from_settings(&IdentityToolkitSettings {
            base_url: "http://127.0.0.1:9099/identitytoolkit.googleapis.com/".to_string(),
            ..settings_with_key()
        })
        .unwrap();

        let url = backend.endpoint("signInWithIdp").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithIdp?key=test-key"
        );
    }

    #[test]
    fn test_from_settings_rejects_empty_key_and_bad_url() {
        let empty_key = IdentityToolkitSettings {
            api_key: Some(String::new()),
            api_key_env: None,
            ..Default::default()
        };
        assert!(matches!(
            IdentityToolkitBackend::from_settings(&empty_key),
            Err(IdentityToolkitError::MissingApiKey)
        ));

        let bad_url = IdentityToolkitSettings {
            base_url: "not a url".to_string(),
            ..settings_with_key()
        };
        assert!(matches!(
            IdentityToolkitBackend::from_settings(&bad_url),
            Err(IdentityToolkitError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_response_into_session() {
        let response: SignInResponse = serde_json::from_value(serde_json::json!({
            "localId": "uid-1",
            "providerId": "google.com",
            "email": "test@example.com",
            "displayName": "Test User",
            "photoUrl": "https://example.com/me.png",
            "idToken": "web-id-token",
            "refreshToken": "web-refresh-token",
            "expiresIn": "3600",
            "isNewUser": true
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let session = response.into_session("google.com", now);

        let user = session.user.as_ref().unwrap();
        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.provider_id, "firebase");
        assert_eq!(user.email.as_deref(), Some("test@example.com"));
        assert_eq!(session.provider_id.as_deref(), Some("google.com"));
        assert_eq!(session.expires_at, Some(now + Duration::hours(1)));
        assert!(session.is_new_user);
    }

    #[test]
    fn test_phone_response_falls_back_to_credential_provider() {
        let response: SignInResponse = serde_json::from_value(serde_json::json!({
            "localId": "uid-2",
            "phoneNumber": "+15555550100",
            "idToken": "web-id-token",
            "refreshToken": "web-refresh-token",
            "expiresIn": "3600"
        }))
        .unwrap();

        let session = response.into_session("phone", Utc::now());

        assert_eq!(session.provider_id.as_deref(), Some("phone"));
        assert_eq!(
            session.user.unwrap().phone_number.as_deref(),
            Some("+15555550100")
        );
    }

    #[test]
    fn test_out_of_range_lifetime_leaves_expiry_unknown() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for expires_in in ["9223372036854775807", "-9223372036854775808", "not-a-number"] {
            let response: SignInResponse = serde_json::from_value(serde_json::json!({
                "localId": "uid-3",
                "idToken": "web-id-token",
                "expiresIn": expires_in
            }))
            .unwrap();

            let session = response.into_session("google.com", now);

            assert!(session.expires_at.is_none(), "{expires_in}");
            assert_eq!(session.user.unwrap().uid, "uid-3");
        }
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"INVALID_IDP_RESPONSE","errors":[]}}"#;
        assert_eq!(api_error_message(body), "INVALID_IDP_RESPONSE");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }
}
