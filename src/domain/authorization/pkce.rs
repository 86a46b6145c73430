//! PKCE (Proof Key for Code Exchange) verification, RFC 7636.
//!
//! Pure functions with no state. Every comparison against the stored challenge runs in
//! constant time with respect to the secret value.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::value_objects::CodeChallengeMethod;

pub const VERIFIER_MIN_LEN: usize = 43;
pub const VERIFIER_MAX_LEN: usize = 128;

/// Length of `BASE64URL(SHA256(..))` without padding.
const S256_CHALLENGE_LEN: usize = 43;

/// Check `code_verifier` against a stored `code_challenge`.
///
/// Empty inputs fail closed.
pub fn verify(code_verifier: &str, code_challenge: &str, method: CodeChallengeMethod) -> bool {
    if code_verifier.is_empty() || code_challenge.is_empty() {
        return false;
    }

    let expected = generate_challenge(code_verifier, method);
    expected.as_bytes().ct_eq(code_challenge.as_bytes()).into()
}

/// Derive the challenge a client would send for `code_verifier`.
///
/// Tooling and tests only; the runtime path goes through [`verify`].
pub fn generate_challenge(code_verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::S256 => URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes())),
        CodeChallengeMethod::Plain => code_verifier.to_string(),
    }
}

/// 43 to 128 characters from `[A-Za-z0-9-._~]`.
pub fn is_valid_verifier_format(code_verifier: &str) -> bool {
    (VERIFIER_MIN_LEN..=VERIFIER_MAX_LEN).contains(&code_verifier.len())
        && code_verifier.bytes().all(is_unreserved)
}

/// Shape check for a challenge received at `/authorize`.
///
/// `S256` challenges are unpadded base64url SHA-256 digests; `plain` challenges are
/// verifiers and follow the verifier grammar.
pub fn is_valid_challenge_format(code_challenge: &str, method: CodeChallengeMethod) -> bool {
    match method {
        CodeChallengeMethod::S256 => {
            code_challenge.len() == S256_CHALLENGE_LEN
                && URL_SAFE_NO_PAD
                    .decode(code_challenge)
                    .is_ok_and(|digest| digest.len() == 32)
        }
        CodeChallengeMethod::Plain => is_valid_verifier_format(code_challenge),
    }
}

/// A fresh 43-character verifier from 32 bytes of OS randomness.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}
