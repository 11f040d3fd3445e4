//! Unverified JWT claims decoding
//!
//! The client never verifies signatures; the server is the only issuer and
//! every authenticated call is validated server-side anyway. Claims are read
//! purely to derive the user identity and the expiry instant.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::Error;

/// Claims the Snaplist API embeds in its tokens
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject: the username
    pub sub: String,

    /// Numeric user id
    pub uid: i64,

    /// Expiry instant, epoch seconds
    pub exp: i64,
}

/// Decode the payload segment of a JWT.
///
/// Total: any malformed structure or missing claim is an `Error::Decode`,
/// never a panic and never a partial result.
pub fn decode_claims(token: &str) -> Result<Claims, Error> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(Error::decode("token is not a three-segment JWT")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| Error::decode(format!("payload is not base64url: {}", err)))?;

    serde_json::from_slice(&bytes).map_err(|err| Error::decode(format!("invalid claims: {}", err)))
}
