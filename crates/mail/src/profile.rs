//! Profile resolution for the signed-in user
//!
//! Resolution runs once per login and never fails: the People API is tried
//! first, then the claims of the OpenID id token, then the sentinel
//! [`UserIdentity::unknown`].

use base64::prelude::*;
use log::{debug, warn};
use serde::Deserialize;

use crate::gmail::api::PersonResponse;
use crate::gmail::{ProfileApi, TokenGrant};
use crate::models::UserIdentity;

/// Identity claims carried in an id token payload
///
/// All fields are optional; the default value is what a malformed token
/// decodes to.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct IdTokenClaims {
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl IdTokenClaims {
    /// Turn claims into an identity, if they name anyone at all
    fn into_identity(self) -> Option<UserIdentity> {
        if self.name.is_none() && self.email.is_none() {
            return None;
        }
        Some(
            UserIdentity::new(self.name.unwrap_or_default(), self.email.unwrap_or_default())
                .with_picture(self.picture),
        )
    }
}

/// Resolve the display identity for a freshly granted token
pub fn resolve_identity(api: &dyn ProfileApi, grant: &TokenGrant) -> UserIdentity {
    match api.get_profile(&grant.access_token) {
        Ok(profile) => {
            if let Some(identity) = identity_from_profile(profile) {
                debug!("Identity resolved from People API");
                return identity;
            }
            debug!("People API response incomplete, trying id token");
        }
        Err(e) => warn!("Profile lookup failed, trying id token: {:#}", e),
    }

    if let Some(id_token) = &grant.id_token
        && let Some(identity) = decode_id_token(id_token).into_identity()
    {
        debug!("Identity resolved from id token");
        return identity;
    }

    warn!("No profile source available, using placeholder identity");
    UserIdentity::unknown()
}

/// Build an identity from a People API response
///
/// Incomplete means either list is missing or empty, or its first entry lacks
/// a value.
fn identity_from_profile(profile: PersonResponse) -> Option<UserIdentity> {
    let name = profile.names?.into_iter().next()?.display_name?;
    let email = profile.email_addresses?.into_iter().next()?.value?;
    Some(UserIdentity::new(name, email))
}

/// Decode the payload (middle segment) of a JWT without verifying it
///
/// Any failure (missing segment, bad base64, bad JSON) yields empty claims.
pub fn decode_id_token(token: &str) -> IdTokenClaims {
    let Some(payload) = token.split('.').nth(1) else {
        return IdTokenClaims::default();
    };
    decode_base64_segment(payload)
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Decode a base64 JWT segment
///
/// JWTs use unpadded URL-safe base64, but be lenient about padding and
/// alphabet.
fn decode_base64_segment(data: &str) -> Option<Vec<u8>> {
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE};

    let decoders: &[&base64::engine::GeneralPurpose] =
        &[&BASE64_URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD];

    decoders.iter().find_map(|decoder| decoder.decode(data).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::api::{PersonEmailAddress, PersonName};
    use crate::models::AccessToken;
    use anyhow::{Context, Result};

    struct FakeProfile(Option<PersonResponse>);

    impl ProfileApi for FakeProfile {
        fn get_profile(&self, _token: &AccessToken) -> Result<PersonResponse> {
            self.0.clone().context("HTTP 403")
        }
    }

    fn person(name: Option<&str>, email: Option<&str>) -> PersonResponse {
        PersonResponse {
            names: name.map(|n| {
                vec![PersonName {
                    display_name: Some(n.to_string()),
                }]
            }),
            email_addresses: email.map(|e| {
                vec![PersonEmailAddress {
                    value: Some(e.to_string()),
                }]
            }),
        }
    }

    fn jwt(payload_json: &str) -> String {
        format!(
            "eyJhbGciOiJSUzI1NiJ9.{}.signature",
            BASE64_URL_SAFE_NO_PAD.encode(payload_json)
        )
    }

    fn grant(id_token: Option<String>) -> TokenGrant {
        TokenGrant {
            access_token: AccessToken::new("token"),
            id_token,
        }
    }

    #[test]
    fn test_decode_id_token() {
        let token = jwt(r#"{"name":"Jane Doe","email":"jane@example.com","picture":"https://x/p.png","sub":"1"}"#);
        let claims = decode_id_token(&token);
        assert_eq!(claims.name.as_deref(), Some("Jane Doe"));
        assert_eq!(claims.email.as_deref(), Some("jane@example.com"));
        assert_eq!(claims.picture.as_deref(), Some("https://x/p.png"));
    }

    #[test]
    fn test_decode_id_token_malformed_is_empty() {
        assert_eq!(decode_id_token(""), IdTokenClaims::default());
        assert_eq!(decode_id_token("no-dots-here"), IdTokenClaims::default());
        assert_eq!(decode_id_token("a.!!!not-base64!!!.c"), IdTokenClaims::default());
        let not_json = format!("a.{}.c", BASE64_URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(decode_id_token(&not_json), IdTokenClaims::default());
    }

    #[test]
    fn test_decode_id_token_accepts_padded_segment() {
        let payload = BASE64_URL_SAFE.encode(r#"{"email":"a@b.co"}"#);
        let claims = decode_id_token(&format!("h.{}.s", payload));
        assert_eq!(claims.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_people_api_wins() {
        let api = FakeProfile(Some(person(Some("Jane Doe"), Some("jane@example.com"))));
        let token = jwt(r#"{"name":"Other","email":"other@example.com"}"#);
        let user = resolve_identity(&api, &grant(Some(token)));
        assert_eq!(user, UserIdentity::new("Jane Doe", "jane@example.com"));
    }

    #[test]
    fn test_incomplete_profile_falls_back_to_id_token() {
        let api = FakeProfile(Some(person(Some("Jane Doe"), None)));
        let token = jwt(r#"{"name":"Jane D","email":"jane@example.com","picture":"p"}"#);
        let user = resolve_identity(&api, &grant(Some(token)));
        assert_eq!(user.name, "Jane D");
        assert_eq!(user.picture.as_deref(), Some("p"));
    }

    #[test]
    fn test_failed_profile_falls_back_to_id_token() {
        let api = FakeProfile(None);
        let token = jwt(r#"{"email":"jane@example.com"}"#);
        let user = resolve_identity(&api, &grant(Some(token)));
        assert_eq!(user.name, "");
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn test_everything_failing_yields_sentinel() {
        let api = FakeProfile(None);
        assert!(resolve_identity(&api, &grant(None)).is_unknown());
        assert!(resolve_identity(&api, &grant(Some("garbage".into()))).is_unknown());
    }
}
