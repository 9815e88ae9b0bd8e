//! Bearer token payload decoding. The payload segment is decoded only to
//! extract the subject identifier; the signature is NOT verified and expiry is
//! NOT checked client-side. The backend remains authoritative for both.

use crate::error::AuthError;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::Value;

/// Extracts the subject identifier from a JWT-shaped token.
///
/// # Errors
///
/// Returns `AuthError::MalformedToken` when the token has no payload segment,
/// the segment is not base64url JSON, or no subject claim is present.
pub fn decode_subject(token: &str) -> Result<String, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("token has no payload segment".to_string()))?;

    let bytes = Base64UrlUnpadded::decode_vec(payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;

    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not JSON: {e}")))?;

    claims["sub"]
        .as_str()
        .or_else(|| claims["id"].as_str())
        .map(ToString::to_string)
        .ok_or_else(|| AuthError::MalformedToken("no subject claim in payload".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned_token(claims: &serde_json::Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{payload}.")
    }

    #[test]
    fn extracts_the_sub_claim() {
        let token = unsigned_token(&serde_json::json!({ "sub": "u-42", "exp": 0 }));
        assert_eq!(decode_subject(&token).expect("subject decodes"), "u-42");
    }

    #[test]
    fn falls_back_to_the_id_claim() {
        let token = unsigned_token(&serde_json::json!({ "id": "u-7" }));
        assert_eq!(decode_subject(&token).expect("subject decodes"), "u-7");
    }

    #[test]
    fn rejects_a_token_without_segments() {
        assert!(matches!(
            decode_subject("opaque-token"),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn rejects_a_payload_that_is_not_base64() {
        assert!(matches!(
            decode_subject("aGVhZGVy.!!!!.sig"),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn rejects_a_payload_without_a_subject() {
        let token = unsigned_token(&serde_json::json!({ "scope": "app" }));
        assert!(matches!(
            decode_subject(&token),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn expiry_is_not_checked_client_side() {
        // Expired long ago; decoding still succeeds, the backend decides.
        let token = unsigned_token(&serde_json::json!({ "sub": "u-1", "exp": 1 }));
        assert_eq!(decode_subject(&token).expect("subject decodes"), "u-1");
    }
}
