use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Current time, epoch seconds
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Build an unsigned JWT with the claims the Snaplist API issues
pub fn make_token(sub: &str, uid: i64, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({ "sub": sub, "uid": uid, "exp": exp });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.test-signature", header, payload)
}
