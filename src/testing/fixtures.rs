//! Test fixtures providing pre-built test objects
//!
//! Native bridge payloads use the wire shape the device plugin produces, so
//! they go through the same decoding as real answers.

use crate::models::{SessionResult, SessionUser};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use super::constants::{TEST_EMAIL, TEST_PHONE, TEST_USER_NAME};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    #[must_use]
    pub fn google_payload(id_token: &str) -> Value {
        json!({ "providerId": "google.com", "idToken": id_token })
    }

    /// Facebook's access token travels in `idToken`
    #[must_use]
    pub fn facebook_payload(access_token: &str) -> Value {
        json!({ "providerId": "facebook.com", "idToken": access_token })
    }

    #[must_use]
    pub fn twitter_payload(token: &str, secret: &str) -> Value {
        json!({ "providerId": "twitter.com", "idToken": token, "secret": secret })
    }

    #[must_use]
    pub fn apple_payload(id_token: &str) -> Value {
        json!({ "providerId": "apple.com", "idToken": id_token, "rawNonce": "test-nonce" })
    }

    /// Phone payload; omit `verification_code` for the "SMS sent" answer
    #[must_use]
    pub fn phone_payload(verification_id: &str, verification_code: Option<&str>) -> Value {
        let mut payload = json!({ "providerId": "phone", "verificationId": verification_id });
        if let Some(code) = verification_code {
            payload["verificationCode"] = Value::String(code.to_string());
        }
        payload
    }

    /// Create a signed-in web session for `uid`
    #[must_use]
    pub fn session(uid: &str) -> SessionResult {
        SessionResult {
            user: Some(SessionUser {
                uid: uid.to_string(),
                provider_id: "firebase".to_string(),
                display_name: Some(TEST_USER_NAME.to_string()),
                photo_url: None,
                phone_number: Some(TEST_PHONE.to_string()),
                email: Some(TEST_EMAIL.to_string()),
            }),
            provider_id: Some("google.com".to_string()),
            id_token: Some("test_session_id_token".to_string()),
            refresh_token: Some("test_refresh_token".to_string()),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).single(),
            is_new_user: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhoneSignInResult;

    #[test]
    fn test_phone_payload_without_code() {
        let result: PhoneSignInResult =
            serde_json::from_value(TestFixtures::phone_payload("V1", None)).unwrap();
        assert_eq!(result.verification_id.as_deref(), Some("V1"));
        assert!(result.verification_code().is_none());
    }

    #[test]
    fn test_session_has_user() {
        let session = TestFixtures::session("uid-1");
        assert_eq!(session.user.unwrap().uid, "uid-1");
    }
}
