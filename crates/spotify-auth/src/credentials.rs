//! HTTP Basic credentials for confidential-client token requests (RFC 7617)
//!
//! The encoded value is derived on every request and handed straight to the
//! transport. It is never cached and never logged.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode a client id/secret pair as an `Authorization` header value.
///
/// Returns `"Basic " + base64(client_id + ":" + client_secret)`. Empty
/// inputs are encoded as given; validation belongs to the flow builders.
pub fn encode(client_id: &str, client_secret: &str) -> String {
    let credential = format!("{client_id}:{client_secret}");
    format!("Basic {}", STANDARD.encode(credential.as_bytes()))
}
