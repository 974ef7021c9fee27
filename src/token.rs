use crate::error::{ApiError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Identity claims carried in the bearer token payload.
#[derive(Debug, Deserialize)]
struct Claims {
    email: String,
}

/// Decode the email claim from a bearer token.
///
/// The signature is NOT verified: the backend independently validates every
/// token it receives, so this layer only needs the payload. This is the one
/// place the client inspects token contents rather than treating the token
/// as opaque.
///
/// Every malformation (missing payload segment, undecodable base64, payload
/// without an `email` claim) surfaces as [`ApiError::InvalidToken`].
pub fn decode_email(token: &str) -> Result<String> {
    let payload = token.split('.').nth(1).ok_or(ApiError::InvalidToken)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ApiError::InvalidToken)?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|_| ApiError::InvalidToken)?;
    Ok(claims.email)
}

#[cfg(test)]
pub(crate) fn encode_test_token(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"email": email, "iat": 1}).to_string(),
    );
    format!("{}.{}.sig", header, payload)
}
