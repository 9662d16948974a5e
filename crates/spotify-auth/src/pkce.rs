//! PKCE (Proof Key for Code Exchange) helpers per RFC 7636
//!
//! The verifier stays with the caller until the token exchange; only the
//! derived challenge goes into the authorize URL. The authorization server
//! recomputes the challenge from the verifier to tie both requests together.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// The only challenge method this crate produces.
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// Generate a cryptographically random PKCE code verifier.
///
/// 64 random bytes encoded as URL-safe base64 without padding: 86 characters,
/// inside the 43-128 range RFC 7636 allows.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compute the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate an opaque `state` value for CSRF protection.
///
/// The caller keeps it and compares it with the `state` echoed on the
/// redirect; this crate only carries it into the URL.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
